//! Demo controller task body
//!
//! Paints the splash screen through the submission API and returns. The
//! commands are only queued here; the rendering task draws them.

use display::color::Color;
use display::queue::Display;
use embedded_graphics::pixelcolor::RgbColor;

use crate::fonts::DEMO_FONT;

/// Background of the splash screen
pub const BACKGROUND: Color = Color::GREEN;

/// First line, drawn at the origin
pub const LINE_ONE: &str = "Hellow";

/// Second line, one cell below the first
pub const LINE_TWO: &str = "World!";

/// Queue the splash screen: fill, then two lines of text.
pub async fn run(display: Display<'_>) {
    display.fill_screen(BACKGROUND).await;
    display
        .draw_text(&DEMO_FONT, Color::WHITE, Color::BLACK, 0, 0, LINE_ONE)
        .await;
    display
        .draw_text(
            &DEMO_FONT,
            Color::WHITE,
            Color::BLACK,
            0,
            DEMO_FONT.height(),
            LINE_TWO,
        )
        .await;

    #[cfg(feature = "defmt")]
    defmt::info!("controller: splash queued");
}
