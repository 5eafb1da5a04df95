//! ST7789 bring-up
//!
//! One-time panel initialization run before the rendering task starts: a
//! hardware reset pulse followed by a fixed command script. Afterwards the
//! panel is awake, in 16-bit RGB565 mode, and the bus is left in 8-bit
//! command mode, which is what the rendering core expects.
//!
//! # Sequence
//!
//! | Step | Command | Data | Wait |
//! |------|---------|------|------|
//! | Hard reset | RST low / high | - | 10 ms / 160 ms |
//! | Software reset | SWRESET (0x01) | - | 130 ms |
//! | Sleep out | SLPOUT (0x11) | - | 500 ms |
//! | Pixel format | COLMOD (0x3A) | 0x55 (16 bit, 65k) | 10 ms |
//! | Inversion on | INVON (0x21) | - | 10 ms |
//! | Normal mode | NORON (0x13) | - | 10 ms |
//! | Display on | DISPON (0x29) | - | 10 ms |
//! | Scan order | MADCTL (0x36) | 0x00 (RGB) | 10 ms |

use display::protocol::Command;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use platform::PanelBus;

/// COLMOD parameter: 65k colors, 16 bits per pixel.
pub const COLMOD_RGB565: u8 = 0x55;

/// MADCTL parameter: top-to-bottom, left-to-right, RGB order.
pub const MADCTL_RGB: u8 = 0x00;

/// Reset line held low for this long.
pub const RESET_PULSE_MS: u32 = 10;

/// Wait after releasing the reset line.
pub const RESET_RECOVERY_MS: u32 = 160;

/// One scripted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitStep {
    /// Command byte
    pub command: Command,
    /// Parameter bytes
    pub data: &'static [u8],
    /// Settle time after the command
    pub delay_ms: u32,
}

impl InitStep {
    const fn new(command: Command, data: &'static [u8], delay_ms: u32) -> Self {
        Self {
            command,
            data,
            delay_ms,
        }
    }
}

/// Commands sent after the hardware reset, in order.
pub const INIT_SCRIPT: &[InitStep] = &[
    InitStep::new(Command::SoftwareReset, &[], 130),
    InitStep::new(Command::SleepOut, &[], 500),
    InitStep::new(Command::PixelFormat, &[COLMOD_RGB565], 10),
    InitStep::new(Command::InversionOn, &[], 10),
    InitStep::new(Command::NormalMode, &[], 10),
    InitStep::new(Command::DisplayOn, &[], 10),
    InitStep::new(Command::MemoryAccessControl, &[MADCTL_RGB], 10),
];

/// Bring-up failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError {
    /// Command or parameter could not be sent
    Bus,
    /// Reset or backlight line could not be driven
    Pin,
}

impl core::fmt::Display for BringUpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "panel bus error during bring-up"),
            Self::Pin => write!(f, "control pin error during bring-up"),
        }
    }
}

/// Reset the panel, run [`INIT_SCRIPT`] and switch the backlight on.
pub fn bring_up<B, RST, BL, D>(
    bus: &mut B,
    reset: &mut RST,
    backlight: &mut BL,
    delay: &mut D,
) -> Result<(), BringUpError>
where
    B: PanelBus,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    reset.set_low().map_err(|_| BringUpError::Pin)?;
    delay.delay_ms(RESET_PULSE_MS);
    reset.set_high().map_err(|_| BringUpError::Pin)?;
    delay.delay_ms(RESET_RECOVERY_MS);

    for step in INIT_SCRIPT {
        send_step(bus, step).map_err(|_| BringUpError::Bus)?;
        delay.delay_ms(step.delay_ms);
    }

    backlight.set_high().map_err(|_| BringUpError::Pin)?;

    #[cfg(feature = "defmt")]
    defmt::info!("display: panel initialized");
    Ok(())
}

fn send_step<B: PanelBus>(bus: &mut B, step: &InitStep) -> Result<(), B::Error> {
    bus.select()?;
    bus.write_command(step.command.into())?;
    if !step.data.is_empty() {
        bus.write_data(step.data)?;
    }
    bus.deselect()
}
