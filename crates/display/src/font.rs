//! Bitmap fonts
//!
//! A font is a fixed cell size plus a table of glyphs. Each glyph holds one
//! coverage byte per pixel, row-major with a stride of `width`; the byte is
//! an alpha value fed to [`blend`](crate::color::blend), not a color.
//!
//! Fonts are `'static` and read-only, so they are shared between tasks
//! without synchronization.

/// One character's coverage bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    code: char,
    coverage: &'static [u8],
}

impl Glyph {
    /// Glyph for `code`. `coverage` must hold `width * height` bytes of the
    /// font it is placed in.
    pub const fn new(code: char, coverage: &'static [u8]) -> Self {
        Self { code, coverage }
    }

    /// Character this glyph renders
    pub const fn code(&self) -> char {
        self.code
    }

    /// Row-major coverage bytes
    pub const fn coverage(&self) -> &'static [u8] {
        self.coverage
    }
}

/// Fixed-cell bitmap font.
#[derive(Debug, PartialEq, Eq)]
pub struct Font {
    width: u16,
    height: u16,
    baseline: u16,
    glyphs: &'static [Glyph],
}

impl Font {
    /// Font with `width` x `height` cells; `baseline` is measured from the
    /// top of the cell.
    pub const fn new(width: u16, height: u16, baseline: u16, glyphs: &'static [Glyph]) -> Self {
        Self {
            width,
            height,
            baseline,
            glyphs,
        }
    }

    /// Cell width in pixels, also the cursor advance.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Cell height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Baseline row, counted from the top of the cell
    pub const fn baseline(&self) -> u16 {
        self.baseline
    }

    /// Pixels per glyph
    pub fn glyph_pixels(&self) -> usize {
        usize::from(self.width).saturating_mul(usize::from(self.height))
    }

    /// Every glyph in table order
    pub const fn glyphs(&self) -> &'static [Glyph] {
        self.glyphs
    }

    /// Bitmap for `ch`, or `None` if the font has no such glyph.
    pub fn glyph(&self, ch: char) -> Option<&'static Glyph> {
        let glyphs: &'static [Glyph] = self.glyphs;
        glyphs.iter().find(|g| g.code == ch)
    }
}

/// Look up the bitmap of `ch` in `font`.
pub fn lookup(font: &Font, ch: char) -> Option<&'static [u8]> {
    font.glyph(ch).map(Glyph::coverage)
}
