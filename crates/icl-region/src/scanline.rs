//! Scanlines - maximal horizontal runs of equal pixels

use icl_core::Point;

/// Pixels `[x, x + len)` on row `y`, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanLine {
    /// First x coordinate
    pub x: i32,
    /// Row
    pub y: i32,
    /// Number of pixels
    pub len: i32,
}

impl ScanLine {
    /// Create a new scanline
    #[inline]
    pub const fn new(x: i32, y: i32, len: i32) -> Self {
        Self { x, y, len }
    }

    /// One past the last x coordinate
    #[inline]
    pub fn end(&self) -> i32 {
        self.x + self.len
    }

    /// Check if (x, y) lies on this scanline
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        y == self.y && x >= self.x && x < self.end()
    }

    /// Iterate over the pixels of this scanline, left to right
    pub fn pixels(&self) -> impl Iterator<Item = Point> + '_ {
        (self.x..self.end()).map(move |x| Point::new(x, self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanline_pixels() {
        let sl = ScanLine::new(3, 7, 3);
        let pts: Vec<Point> = sl.pixels().collect();
        assert_eq!(pts, vec![Point::new(3, 7), Point::new(4, 7), Point::new(5, 7)]);
        assert_eq!(sl.end(), 6);
        assert!(sl.contains(5, 7));
        assert!(!sl.contains(6, 7));
        assert!(!sl.contains(4, 6));
    }
}
