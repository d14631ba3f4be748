//! Img - The planar image container
//!
//! `Img<T>` stores one plane per channel, each plane row-major with
//! `width * height` samples. Every image carries a region of interest
//! (ROI); processing functions read only the pixels inside it.
//!
//! # Coordinates
//!
//! Pixel coordinates are always absolute image coordinates, also when
//! they lie inside a ROI that does not start at the origin.

mod access;
mod pixel;

pub use pixel::{Depth, Pixel};

use crate::error::{Error, Result};
use crate::rect::Rect;

/// Image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Planar image with region of interest
///
/// # Examples
///
/// ```
/// use icl_core::{Img, Rect, Size};
///
/// let mut img = Img::<u8>::new(Size::new(64, 48), 1).unwrap();
/// assert_eq!(img.roi(), Rect::new_unchecked(0, 0, 64, 48));
///
/// img.set_roi(Rect::new_unchecked(8, 8, 16, 16)).unwrap();
/// assert_eq!(img.roi().area(), 256);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Img<T: Pixel> {
    size: Size,
    planes: Vec<Vec<T>>,
    roi: Rect,
}

impl<T: Pixel> Img<T> {
    /// Create a zero-initialized image.
    ///
    /// Images without channels are allowed; they hold no pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(size: Size, channels: usize) -> Result<Self> {
        Self::check_size(size)?;
        let planes = (0..channels)
            .map(|_| vec![T::default(); size.area()])
            .collect();
        Ok(Self {
            size,
            planes,
            roi: Self::full_rect(size),
        })
    }

    /// Create a single-channel image from row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is empty or `data` does not hold
    /// exactly `width * height` samples.
    pub fn from_data(size: Size, data: Vec<T>) -> Result<Self> {
        Self::from_channels(size, vec![data])
    }

    /// Create a multi-channel image from one row-major plane per channel.
    ///
    /// Use [`Img::new`] for images without channels.
    pub fn from_channels(size: Size, planes: Vec<Vec<T>>) -> Result<Self> {
        Self::check_size(size)?;
        if planes.is_empty() {
            return Err(Error::InvalidChannelCount(0));
        }
        if let Some(plane) = planes.iter().find(|p| p.len() != size.area()) {
            return Err(Error::DimensionMismatch {
                expected: size.area(),
                actual: plane.len(),
            });
        }
        Ok(Self {
            size,
            planes,
            roi: Self::full_rect(size),
        })
    }

    fn check_size(size: Size) -> Result<()> {
        let max = i32::MAX as u32;
        if size.width == 0 || size.height == 0 || size.width > max || size.height > max {
            return Err(Error::InvalidDimension {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }

    fn full_rect(size: Size) -> Rect {
        Rect::new_unchecked(0, 0, size.width as i32, size.height as i32)
    }

    /// Image dimensions
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Sample type
    #[inline]
    pub fn depth(&self) -> Depth {
        T::DEPTH
    }

    /// Current region of interest
    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// Check whether the ROI covers the whole image
    pub fn has_full_roi(&self) -> bool {
        self.roi == Self::full_rect(self.size)
    }

    /// Set the region of interest.
    ///
    /// Empty ROIs are accepted; they select no pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoi`] if `roi` has negative extent or is not
    /// contained in the image.
    pub fn set_roi(&mut self, roi: Rect) -> Result<()> {
        if roi.w < 0 || roi.h < 0 || !Self::full_rect(self.size).contains_rect(&roi) {
            return Err(Error::InvalidRoi {
                roi,
                width: self.size.width,
                height: self.size.height,
            });
        }
        self.roi = roi;
        Ok(())
    }

    /// Builder variant of [`Img::set_roi`].
    pub fn with_roi(mut self, roi: Rect) -> Result<Self> {
        self.set_roi(roi)?;
        Ok(self)
    }

    /// Reset the ROI to the full image.
    pub fn reset_roi(&mut self) {
        self.roi = Self::full_rect(self.size);
    }

    /// Row-major samples of one channel.
    pub fn channel(&self, c: usize) -> Option<&[T]> {
        self.planes.get(c).map(|p| p.as_slice())
    }

    /// Mutable row-major samples of one channel.
    pub fn channel_mut(&mut self, c: usize) -> Option<&mut [T]> {
        self.planes.get_mut(c).map(|p| p.as_mut_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image() {
        let img = Img::<u8>::new(Size::new(4, 3), 2).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.channels(), 2);
        assert_eq!(img.depth(), Depth::Depth8u);
        assert!(img.has_full_roi());
        assert!(img.channel(1).unwrap().iter().all(|&v| v == 0));
        assert!(img.channel(2).is_none());
    }

    #[test]
    fn test_new_image_zero_size() {
        assert_eq!(
            Img::<f32>::new(Size::new(0, 3), 1).unwrap_err(),
            Error::InvalidDimension {
                width: 0,
                height: 3
            }
        );
    }

    #[test]
    fn test_from_data_length_mismatch() {
        let err = Img::from_data(Size::new(2, 2), vec![1u8, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_from_channels() {
        let img = Img::from_channels(Size::new(2, 1), vec![vec![1u8, 2], vec![3, 4]]).unwrap();
        assert_eq!(img.channels(), 2);
        assert_eq!(img.channel(1), Some(&[3u8, 4][..]));
        assert_eq!(
            Img::<u8>::from_channels(Size::new(2, 1), vec![]).unwrap_err(),
            Error::InvalidChannelCount(0)
        );
    }

    #[test]
    fn test_set_roi() {
        let mut img = Img::<i16>::new(Size::new(10, 10), 1).unwrap();
        img.set_roi(Rect::new_unchecked(2, 3, 4, 5)).unwrap();
        assert_eq!(img.roi(), Rect::new_unchecked(2, 3, 4, 5));
        assert!(!img.has_full_roi());

        assert!(img.set_roi(Rect::new_unchecked(8, 8, 4, 4)).is_err());
        assert!(img.set_roi(Rect::new_unchecked(-1, 0, 4, 4)).is_err());
        // failed update keeps the previous roi
        assert_eq!(img.roi(), Rect::new_unchecked(2, 3, 4, 5));

        img.reset_roi();
        assert!(img.has_full_roi());
    }
}
