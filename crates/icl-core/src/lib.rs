//! ICL Core - Basic data structures for image processing
//!
//! This crate provides the fundamental data structures used throughout
//! the ICL image processing library:
//!
//! - [`Img`] - Planar image container with region of interest
//! - [`Pixel`] / [`Depth`] - Supported sample types
//! - [`Rect`] - Rectangular regions (ROIs and bounding boxes)
//! - [`Point`] / [`Point32f`] - Pixel positions and sub-pixel coordinates

pub mod error;
pub mod img;
pub mod point;
pub mod rect;

pub use error::{Error, Result};
pub use img::{Depth, Img, Pixel, Size};
pub use point::{Point, Point32f};
pub use rect::Rect;
