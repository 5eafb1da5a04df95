//! ST7789 addressing protocol
//!
//! Every pixel transfer is preceded by the same sequence: select the panel,
//! set the column range (CASET), set the row range (RASET), begin a memory
//! write (RAMWR), then switch the bus to 16-bit frames. The window is not
//! cached between commands; the controller needs it before each write.

use platform::config::{PANEL_HEIGHT, PANEL_OFFSET_X, PANEL_OFFSET_Y, PANEL_WIDTH};
use platform::PanelBus;

use crate::error::RenderError;
use crate::geometry::Rect;

/// ST7789 command opcodes used by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Software reset
    SoftwareReset = 0x01,
    /// Leave sleep mode
    SleepOut = 0x11,
    /// Normal display mode on
    NormalMode = 0x13,
    /// Display inversion on (IPS glass is inverted)
    InversionOn = 0x21,
    /// Display on
    DisplayOn = 0x29,
    /// Column address set
    ColumnAddressSet = 0x2A,
    /// Row address set
    RowAddressSet = 0x2B,
    /// Memory write
    MemoryWrite = 0x2C,
    /// Memory data access control (scan direction, RGB/BGR)
    MemoryAccessControl = 0x36,
    /// Interface pixel format
    PixelFormat = 0x3A,
}

impl From<Command> for u8 {
    fn from(c: Command) -> u8 {
        c as u8
    }
}

/// Visible geometry of the panel and its position inside controller memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Visible columns
    pub width: u16,
    /// Visible rows
    pub height: u16,
    /// Column of the visible area's origin in controller memory
    pub offset_x: u16,
    /// Row of the visible area's origin in controller memory
    pub offset_y: u16,
}

impl PanelConfig {
    /// 240 x 320 ST7789V module.
    pub const ST7789_240X320: Self = Self {
        width: PANEL_WIDTH,
        height: PANEL_HEIGHT,
        offset_x: PANEL_OFFSET_X,
        offset_y: PANEL_OFFSET_Y,
    };

    /// The whole visible area.
    pub const fn full_rect(&self) -> Rect {
        Rect::full(self.width, self.height)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::ST7789_240X320
    }
}

/// Address `rect` (logical coordinates) and leave the bus selected, in
/// memory-write mode, with 16-bit frames.
///
/// Returns the pixel count of the window, the input to
/// [`TransferEngine::arm`](crate::transfer::TransferEngine::arm).
pub fn open_window<B: PanelBus>(
    bus: &mut B,
    rect: Rect,
    panel: &PanelConfig,
) -> Result<u32, RenderError<B::Error>> {
    let window = rect
        .offset(panel.offset_x, panel.offset_y)
        .ok_or(RenderError::WindowOutOfRange)?;

    bus.select().map_err(RenderError::Bus)?;
    let sequence = send_window(bus, &window);
    if let Err(e) = sequence {
        // Leave the bus idle for the next command.
        let _ = bus.deselect();
        return Err(RenderError::Bus(e));
    }
    Ok(window.area())
}

fn send_window<B: PanelBus>(bus: &mut B, window: &Rect) -> Result<(), B::Error> {
    bus.write_command(Command::ColumnAddressSet.into())?;
    bus.write_data16(window.left())?;
    bus.write_data16(window.right())?;
    bus.write_command(Command::RowAddressSet.into())?;
    bus.write_data16(window.top())?;
    bus.write_data16(window.bottom())?;
    bus.write_command(Command::MemoryWrite.into())?;
    bus.begin_stream()
}
