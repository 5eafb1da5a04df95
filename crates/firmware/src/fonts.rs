//! Demo font
//!
//! A 12 x 16 cell font rasterized at compile time from a classic 5 x 7 dot
//! matrix: every dot becomes a 2 x 2 block of full coverage inside a one-pixel
//! margin, and pixels touching a dot edge-on get a faint halo so the glyphs
//! blend softly into the background.
//!
//! Only the characters the firmware prints are included.

// Const rasterizer: indices are bounded by the loop conditions.
#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use display::font::{Font, Glyph};

/// Cell width in pixels
pub const CELL_WIDTH: u16 = 12;

/// Cell height in pixels
pub const CELL_HEIGHT: u16 = 16;

/// Coverage bytes per glyph
pub const CELL_PIXELS: usize = CELL_WIDTH as usize * CELL_HEIGHT as usize;

/// Coverage of a dot pixel
pub const INK: u8 = 255;

/// Coverage of a pixel edge-adjacent to a dot
pub const HALO: u8 = 72;

const DOT_COLUMNS: usize = 5;
const DOT_ROWS: usize = 7;
const SCALE: usize = 2;
const MARGIN: usize = 1;

/// Expand seven 5-bit dot rows (MSB = leftmost) into a coverage cell.
pub const fn rasterize(rows: [u8; DOT_ROWS]) -> [u8; CELL_PIXELS] {
    const W: usize = CELL_WIDTH as usize;
    const H: usize = CELL_HEIGHT as usize;

    let mut cell = [0u8; CELL_PIXELS];
    let mut y = 0;
    while y < DOT_ROWS * SCALE {
        let mut x = 0;
        while x < DOT_COLUMNS * SCALE {
            let bits = rows[y / SCALE];
            if (bits >> (DOT_COLUMNS - 1 - x / SCALE)) & 1 == 1 {
                cell[(y + MARGIN) * W + x + MARGIN] = INK;
            }
            x += 1;
        }
        y += 1;
    }

    let mut out = cell;
    let mut i = 0;
    while i < CELL_PIXELS {
        if cell[i] == 0 {
            let (x, y) = (i % W, i / W);
            let left = x > 0 && cell[i - 1] == INK;
            let right = x + 1 < W && cell[i + 1] == INK;
            let up = y > 0 && cell[i - W] == INK;
            let down = y + 1 < H && cell[i + W] == INK;
            if left || right || up || down {
                out[i] = HALO;
            }
        }
        i += 1;
    }
    out
}

const SPACE: [u8; CELL_PIXELS] = rasterize([0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
const BANG: [u8; CELL_PIXELS] = rasterize([0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]);
const PERIOD: [u8; CELL_PIXELS] = rasterize([0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]);
const COLON: [u8; CELL_PIXELS] = rasterize([0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]);
const DIGIT_0: [u8; CELL_PIXELS] = rasterize([0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]);
const DIGIT_1: [u8; CELL_PIXELS] = rasterize([0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]);
const DIGIT_2: [u8; CELL_PIXELS] = rasterize([0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]);
const DIGIT_3: [u8; CELL_PIXELS] = rasterize([0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]);
const DIGIT_4: [u8; CELL_PIXELS] = rasterize([0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]);
const DIGIT_5: [u8; CELL_PIXELS] = rasterize([0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]);
const DIGIT_6: [u8; CELL_PIXELS] = rasterize([0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]);
const DIGIT_7: [u8; CELL_PIXELS] = rasterize([0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]);
const DIGIT_8: [u8; CELL_PIXELS] = rasterize([0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]);
const DIGIT_9: [u8; CELL_PIXELS] = rasterize([0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]);
const UPPER_H: [u8; CELL_PIXELS] = rasterize([0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]);
const UPPER_W: [u8; CELL_PIXELS] = rasterize([0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]);
const LOWER_D: [u8; CELL_PIXELS] = rasterize([0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F]);
const LOWER_E: [u8; CELL_PIXELS] = rasterize([0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E]);
const LOWER_L: [u8; CELL_PIXELS] = rasterize([0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]);
const LOWER_O: [u8; CELL_PIXELS] = rasterize([0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E]);
const LOWER_R: [u8; CELL_PIXELS] = rasterize([0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10]);
const LOWER_W: [u8; CELL_PIXELS] = rasterize([0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A]);

const GLYPHS: &[Glyph] = &[
    Glyph::new(' ', &SPACE),
    Glyph::new('!', &BANG),
    Glyph::new('.', &PERIOD),
    Glyph::new(':', &COLON),
    Glyph::new('0', &DIGIT_0),
    Glyph::new('1', &DIGIT_1),
    Glyph::new('2', &DIGIT_2),
    Glyph::new('3', &DIGIT_3),
    Glyph::new('4', &DIGIT_4),
    Glyph::new('5', &DIGIT_5),
    Glyph::new('6', &DIGIT_6),
    Glyph::new('7', &DIGIT_7),
    Glyph::new('8', &DIGIT_8),
    Glyph::new('9', &DIGIT_9),
    Glyph::new('H', &UPPER_H),
    Glyph::new('W', &UPPER_W),
    Glyph::new('d', &LOWER_D),
    Glyph::new('e', &LOWER_E),
    Glyph::new('l', &LOWER_L),
    Glyph::new('o', &LOWER_O),
    Glyph::new('r', &LOWER_R),
    Glyph::new('w', &LOWER_W),
];

/// 12 x 16 demo font. Baseline sits under the seventh dot row.
pub static DEMO_FONT: Font = Font::new(CELL_WIDTH, CELL_HEIGHT, 15, GLYPHS);

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap() for readable assertions
mod tests {
    use super::*;
    use platform::config::MAX_GLYPH_PIXELS;

    fn at(cell: &[u8], x: usize, y: usize) -> u8 {
        cell[y * CELL_WIDTH as usize + x]
    }

    #[test]
    fn every_glyph_fills_its_cell() {
        assert!(DEMO_FONT.glyph_pixels() <= MAX_GLYPH_PIXELS);
        for glyph in DEMO_FONT.glyphs() {
            assert_eq!(glyph.coverage().len(), CELL_PIXELS, "{:?}", glyph.code());
        }
    }

    #[test]
    fn demo_strings_are_covered() {
        for ch in "Hellow World! 0123456789:.".chars() {
            assert!(DEMO_FONT.glyph(ch).is_some(), "missing {ch:?}");
        }
    }

    #[test]
    fn dots_scale_to_blocks_with_halo() {
        let h = DEMO_FONT.glyph('H').unwrap().coverage();
        // Top-left dot of 'H' covers (1..3, 1..3).
        assert_eq!(at(h, 1, 1), INK);
        assert_eq!(at(h, 2, 2), INK);
        assert_eq!(at(h, 0, 1), HALO);
        assert_eq!(at(h, 1, 0), HALO);
        assert_eq!(at(h, 0, 0), 0);
        // Crossbar on dot row 3 → pixel rows 7 and 8.
        assert_eq!(at(h, 5, 7), INK);
        assert_eq!(at(h, 5, 6), HALO);
    }

    #[test]
    fn space_is_blank() {
        let space = DEMO_FONT.glyph(' ').unwrap().coverage();
        assert!(space.iter().all(|&c| c == 0));
    }
}
