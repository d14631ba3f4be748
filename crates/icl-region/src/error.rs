//! Error types for icl-region

use thiserror::Error;

/// Errors that can occur during region detection and region queries
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] icl_core::Error),

    /// Image rejected by the detector (channel count, empty ROI)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Graph accessor used on a detection run without graph building
    #[error("region graph not available: detector was configured without graph building")]
    GraphUnavailable,

    /// Region handle from an earlier detection run
    #[error("stale region handle: generation {generation}, detector is at {current}")]
    StaleRegion { generation: u64, current: u64 },

    /// Region handle index out of range
    #[error("unknown region index: {0}")]
    UnknownRegion(usize),

    /// Geometry too small or flat for a feature computation
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
