//! RGB565 color compositing
//!
//! Glyph bitmaps carry one coverage byte per pixel. [`blend`] turns that byte
//! into a packed panel color by interpolating between a foreground and a
//! background color in 8-bit-per-channel space.
//!
//! Channel conversion rounds to nearest in both directions, so
//! `pack(expand(c)) == c` for every 5- and 6-bit value and the interpolation
//! never drifts outside the `[back, fore]` range.

// Channel math is bounded: every intermediate is at most 255 * 255 + 127.
#![allow(clippy::arithmetic_side_effects)]

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Panel color: 5-6-5 packed.
pub type Color = Rgb565;

/// Coverage byte at which the foreground fully replaces the background.
pub const OPAQUE: u8 = u8::MAX;

/// Coverage byte at which only the background is visible.
pub const TRANSPARENT: u8 = 0;

/// Composite `fore` over `back` with the given coverage.
///
/// `coverage == 0` returns `back` exactly and `coverage == 255` returns
/// `fore` exactly. In between each channel is
/// `back * (255 - coverage) / 255 + fore * coverage / 255`.
pub fn blend(fore: Color, back: Color, coverage: u8) -> Color {
    match coverage {
        TRANSPARENT => back,
        OPAQUE => fore,
        alpha => Rgb565::new(
            pack(mix(expand(fore.r(), 5), expand(back.r(), 5), alpha), 5),
            pack(mix(expand(fore.g(), 6), expand(back.g(), 6), alpha), 6),
            pack(mix(expand(fore.b(), 5), expand(back.b(), 5), alpha), 5),
        ),
    }
}

/// Raw 16-bit word as it goes out on the bus.
pub fn to_raw(color: Color) -> u16 {
    RawU16::from(color).into_inner()
}

/// Widen a `bits`-wide channel to 0..=255.
fn expand(value: u8, bits: u32) -> u32 {
    let max = (1u32 << bits) - 1;
    (u32::from(value) * 255 + max / 2) / max
}

/// Narrow a 0..=255 channel back to `bits` wide.
fn pack(value: u32, bits: u32) -> u8 {
    let max = (1u32 << bits) - 1;
    u8::try_from((value * max + 127) / 255).unwrap_or(u8::MAX)
}

fn mix(fore: u32, back: u32, alpha: u8) -> u32 {
    let alpha = u32::from(alpha);
    (back * (255 - alpha) + fore * alpha + 127) / 255
}
