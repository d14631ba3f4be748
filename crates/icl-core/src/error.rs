//! Error types for icl-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// icl-core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid number of channels
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(usize),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Pixel coordinate outside of the image
    #[error("pixel ({x}, {y}) outside of {width}x{height} image")]
    PixelOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// ROI not contained in the image
    #[error("invalid roi ({}, {}, {}x{}) for {}x{} image", .roi.x, .roi.y, .roi.w, .roi.h, .width, .height)]
    InvalidRoi {
        roi: crate::Rect,
        width: u32,
        height: u32,
    },

    /// Buffer length does not match the image dimensions
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for icl-core operations
pub type Result<T> = std::result::Result<T, Error>;
