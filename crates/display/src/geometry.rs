//! Panel rectangles
//!
//! Inclusive bounds in panel pixel coordinates. A [`Rect`] is normalized on
//! construction (`left <= right`, `top <= bottom`), so every rectangle that
//! reaches the addressing protocol covers at least one pixel.

/// Inclusive rectangle in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

impl Rect {
    /// Rectangle spanning columns `x0..=x1` and rows `y0..=y1`, in any order.
    pub const fn new(x0: u16, x1: u16, y0: u16, y1: u16) -> Self {
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rectangle with its top-left corner at `(x, y)`.
    ///
    /// Returns `None` for a zero dimension or when the far edge does not fit
    /// in `u16`.
    pub fn with_size(x: u16, y: u16, width: u16, height: u16) -> Option<Self> {
        let right = x.checked_add(width.checked_sub(1)?)?;
        let bottom = y.checked_add(height.checked_sub(1)?)?;
        Some(Self::new(x, right, y, bottom))
    }

    /// The whole visible area of a `width` x `height` panel.
    pub const fn full(width: u16, height: u16) -> Self {
        Self::new(0, width.saturating_sub(1), 0, height.saturating_sub(1))
    }

    /// First column
    pub const fn left(&self) -> u16 {
        self.left
    }

    /// Last column (inclusive)
    pub const fn right(&self) -> u16 {
        self.right
    }

    /// First row
    pub const fn top(&self) -> u16 {
        self.top
    }

    /// Last row (inclusive)
    pub const fn bottom(&self) -> u16 {
        self.bottom
    }

    /// Column count
    #[allow(clippy::arithmetic_side_effects)] // right >= left by construction
    pub fn width(&self) -> u32 {
        u32::from(self.right - self.left) + 1
    }

    /// Row count
    #[allow(clippy::arithmetic_side_effects)] // bottom >= top by construction
    pub fn height(&self) -> u32 {
        u32::from(self.bottom - self.top) + 1
    }

    /// Pixel count, `(right - left + 1) * (bottom - top + 1)`.
    pub fn area(&self) -> u32 {
        self.width().saturating_mul(self.height())
    }

    /// Shift by a fixed panel offset. `None` if the result leaves `u16`.
    pub fn offset(&self, dx: u16, dy: u16) -> Option<Self> {
        Some(Self {
            left: self.left.checked_add(dx)?,
            right: self.right.checked_add(dx)?,
            top: self.top.checked_add(dy)?,
            bottom: self.bottom.checked_add(dy)?,
        })
    }

    /// Shrink by one pixel on every side. `None` when nothing is left.
    pub fn inset(&self) -> Option<Self> {
        if self.width() < 3 || self.height() < 3 {
            return None;
        }
        Some(Self {
            left: self.left.checked_add(1)?,
            right: self.right.checked_sub(1)?,
            top: self.top.checked_add(1)?,
            bottom: self.bottom.checked_sub(1)?,
        })
    }

    /// Grow by one pixel on every side, stopping at the coordinate limits.
    pub fn outset(&self) -> Self {
        Self {
            left: self.left.saturating_sub(1),
            right: self.right.saturating_add(1),
            top: self.top.saturating_sub(1),
            bottom: self.bottom.saturating_add(1),
        }
    }

    /// Whether `(x, y)` lies inside.
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Whether `other` lies entirely inside.
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.left, other.top) && self.contains(other.right, other.bottom)
    }

    /// Whether the two rectangles share at least one pixel.
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_order() {
        let r = Rect::new(10, 2, 7, 3);
        assert_eq!((r.left(), r.right(), r.top(), r.bottom()), (2, 10, 3, 7));
    }

    #[test]
    fn area_counts_inclusive_bounds() {
        assert_eq!(Rect::new(5, 5, 9, 9).area(), 1);
        assert_eq!(Rect::new(0, 9, 0, 4).area(), 50);
        assert_eq!(Rect::full(240, 320).area(), 76_800);
    }

    #[test]
    fn with_size_rejects_empty_and_overflow() {
        assert_eq!(Rect::with_size(1, 2, 0, 4), None);
        assert_eq!(Rect::with_size(u16::MAX, 0, 2, 1), None);
        assert_eq!(Rect::with_size(4, 6, 12, 16), Some(Rect::new(4, 15, 6, 21)));
    }

    #[test]
    fn inset_needs_three_pixels() {
        assert_eq!(Rect::new(0, 1, 0, 10).inset(), None);
        assert_eq!(Rect::new(0, 2, 0, 2).inset(), Some(Rect::new(1, 1, 1, 1)));
    }

    #[test]
    fn outset_saturates_at_origin() {
        assert_eq!(Rect::new(0, 3, 0, 3).outset(), Rect::new(0, 4, 0, 4));
        assert_eq!(Rect::new(1, 3, 1, 3).outset(), Rect::new(0, 4, 0, 4));
    }

    #[test]
    fn offset_detects_overflow() {
        assert_eq!(Rect::new(0, 9, 0, 9).offset(52, 40), Some(Rect::new(52, 61, 40, 49)));
        assert_eq!(Rect::new(0, u16::MAX, 0, 0).offset(1, 0), None);
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = Rect::new(0, 9, 0, 9);
        let b = Rect::new(9, 12, 9, 12);
        let c = Rect::new(10, 12, 0, 9);
        assert!(a.intersects(&b) && b.intersects(&a));
        assert!(!a.intersects(&c) && !c.intersects(&a));
    }
}
