//! Fatal error handling
//!
//! Setup failures have no recovery path: without a display the device has
//! nothing to fall back to. They are logged and the system halts through the
//! panic handler (`panic-probe` on hardware), which reports the reason to the
//! attached probe.

use display::SetupError;

/// Log `reason` and halt.
#[allow(clippy::panic)] // halting is the only response to a setup failure
pub fn halt(reason: SetupError) -> ! {
    #[cfg(feature = "defmt")]
    defmt::panic!("fatal setup failure: {}", reason);
    #[cfg(not(feature = "defmt"))]
    panic!("fatal setup failure: {reason}");
}

/// Halt on `Err`.
pub trait OrHalt<T> {
    /// Unwrap the value or halt with the setup error.
    fn or_halt(self) -> T;
}

impl<T> OrHalt<T> for Result<T, SetupError> {
    fn or_halt(self) -> T {
        match self {
            Ok(value) => value,
            Err(reason) => halt(reason),
        }
    }
}

/// HardFault handler: report where the faulting context was stacked, halt.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(frame: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault: pc={=u32:#010x} lr={=u32:#010x}",
        frame.pc(),
        frame.lr()
    );
}
