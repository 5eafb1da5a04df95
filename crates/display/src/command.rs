//! Drawing commands
//!
//! The closed set of requests the rendering task understands. A command is a
//! plain value: it is moved into the queue by the producer and moved out by
//! the renderer, with no shared references to mutable state on the way.

use platform::config::TEXT_CAPACITY;

use crate::color::Color;
use crate::font::Font;
use crate::geometry::Rect;

/// Inline text storage of a single [`DisplayCommand::DrawText`].
pub type TextBuf = heapless::Vec<char, TEXT_CAPACITY>;

/// A drawing request.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Paint the whole panel
    FillScreen {
        /// Fill color
        color: Color,
    },
    /// Paint one rectangle
    FillRect {
        /// Area to paint
        rect: Rect,
        /// Fill color
        color: Color,
    },
    /// Filled rectangle with a one-pixel border
    DrawRect {
        /// Interior; the border is drawn one pixel outside it
        rect: Rect,
        /// Interior color
        fore: Color,
        /// Border color
        border: Color,
    },
    /// A run of glyphs on one line
    DrawText {
        /// Font to render with
        font: &'static Font,
        /// Left edge of the first glyph cell
        x: u16,
        /// Top edge of the glyph cells
        y: u16,
        /// Ink color
        fore: Color,
        /// Cell background color
        back: Color,
        /// Characters, at most [`TEXT_CAPACITY`]
        text: TextBuf,
    },
}

impl DisplayCommand {
    /// Short name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FillScreen { .. } => "fill_screen",
            Self::FillRect { .. } => "fill_rect",
            Self::DrawRect { .. } => "draw_rect",
            Self::DrawText { .. } => "draw_text",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::FillScreen { color } => {
                defmt::write!(f, "FillScreen({=u16:#06x})", crate::color::to_raw(*color));
            }
            Self::FillRect { rect, color } => {
                defmt::write!(
                    f,
                    "FillRect({}, {=u16:#06x})",
                    rect,
                    crate::color::to_raw(*color)
                );
            }
            Self::DrawRect { rect, .. } => defmt::write!(f, "DrawRect({})", rect),
            Self::DrawText { x, y, text, .. } => {
                defmt::write!(f, "DrawText({}, {}, {=usize} chars)", x, y, text.len());
            }
        }
    }
}
