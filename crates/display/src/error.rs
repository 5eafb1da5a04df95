//! Error taxonomy
//!
//! Nothing here is reported to producers. [`RenderError`] is logged by the
//! rendering task and the command is dropped; [`SetupError`] halts the system
//! because there is no fallback without a display.

/// Transfer engine refusals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// A transfer is still streaming or not yet acknowledged
    Busy,
    /// Nothing to transfer
    Empty,
}

#[cfg(feature = "std")]
impl std::error::Error for TransferError {}

impl core::fmt::Display for TransferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => write!(f, "transfer already in flight"),
            Self::Empty => write!(f, "zero-pixel transfer"),
        }
    }
}

/// Failure while executing one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError<E> {
    /// The panel bus reported an error
    Bus(E),
    /// The transfer engine refused to arm
    Transfer(TransferError),
    /// Window coordinates overflow once the panel offset is applied
    WindowOutOfRange,
    /// Glyph cell larger than the shared pixel buffer
    GlyphTooLarge,
}

impl<E> RenderError<E> {
    /// Fixed description, usable where `E` has no formatter.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Bus(_) => "panel bus error",
            Self::Transfer(TransferError::Busy) => "transfer already in flight",
            Self::Transfer(TransferError::Empty) => "zero-pixel transfer",
            Self::WindowOutOfRange => "window outside controller address range",
            Self::GlyphTooLarge => "glyph larger than pixel buffer",
        }
    }
}

impl<E> From<TransferError> for RenderError<E> {
    fn from(e: TransferError) -> Self {
        Self::Transfer(e)
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for RenderError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transfer(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for RenderError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[allow(clippy::use_debug)] // bus errors only promise Debug
            Self::Bus(e) => write!(f, "panel bus error: {e:?}"),
            other => f.write_str(other.describe()),
        }
    }
}

/// Unrecoverable failure during startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// The executor could not spawn the named task
    TaskSpawn(&'static str),
    /// A static resource was initialized twice
    AlreadyInitialized(&'static str),
    /// Device peripherals were already taken
    PeripheralsTaken,
    /// Panel bring-up sequence failed
    PanelInit,
}

#[cfg(feature = "std")]
impl std::error::Error for SetupError {}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TaskSpawn(name) => write!(f, "failed to spawn task '{name}'"),
            Self::AlreadyInitialized(what) => write!(f, "{what} already initialized"),
            Self::PeripheralsTaken => write!(f, "device peripherals already taken"),
            Self::PanelInit => write!(f, "panel bring-up failed"),
        }
    }
}
