//! Pixel access functions
//!
//! Getting and setting individual samples, and filling rectangles.

use super::{Img, Pixel};
use crate::error::{Error, Result};
use crate::rect::Rect;

impl<T: Pixel> Img<T> {
    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.size.width || y as u32 >= self.size.height {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    /// Get the sample of channel `c` at (x, y).
    ///
    /// Returns `None` if the coordinates or the channel are out of bounds.
    pub fn get(&self, x: i32, y: i32, c: usize) -> Option<T> {
        let idx = self.index_of(x, y)?;
        self.planes.get(c).map(|p| p[idx])
    }

    /// Get a sample without bounds checking of the coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the computed index or the channel is out of range.
    #[inline]
    pub fn get_unchecked(&self, x: i32, y: i32, c: usize) -> T {
        self.planes[c][y as usize * self.size.width as usize + x as usize]
    }

    /// Set the sample of channel `c` at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] or [`Error::IndexOutOfBounds`]
    /// (for the channel) if the target does not exist.
    pub fn set(&mut self, x: i32, y: i32, c: usize, value: T) -> Result<()> {
        let idx = self.index_of(x, y).ok_or(Error::PixelOutOfBounds {
            x,
            y,
            width: self.size.width,
            height: self.size.height,
        })?;
        let len = self.planes.len();
        let plane = self
            .planes
            .get_mut(c)
            .ok_or(Error::IndexOutOfBounds { index: c, len })?;
        plane[idx] = value;
        Ok(())
    }

    /// Set every sample of every channel.
    pub fn fill(&mut self, value: T) {
        for plane in &mut self.planes {
            plane.fill(value);
        }
    }

    /// Set all samples of channel `c` inside `rect` (clipped to the image).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the channel does not exist.
    pub fn fill_rect(&mut self, rect: Rect, c: usize, value: T) -> Result<()> {
        let len = self.planes.len();
        let width = self.size.width as usize;
        let full = Rect::new_unchecked(0, 0, self.size.width as i32, self.size.height as i32);
        let plane = self
            .planes
            .get_mut(c)
            .ok_or(Error::IndexOutOfBounds { index: c, len })?;
        let Some(r) = rect.intersect(&full) else {
            return Ok(());
        };
        for y in r.y..r.bottom() {
            let row = y as usize * width;
            plane[row + r.x as usize..row + r.right() as usize].fill(value);
        }
        Ok(())
    }
}
