//! ICL - Image component library for Rust
//!
//! # Overview
//!
//! - Planar images with a region of interest ([`Img`])
//! - Connected-component region detection with lazily computed region
//!   features ([`region::RegionDetector`])
//! - Region adjacency and nesting graphs
//! - Curvature scale space corners on region boundaries
//!
//! # Example
//!
//! ```
//! use icl::{Img, Size};
//! use icl::region::{CssParams, RegionDetector};
//!
//! let mut img = Img::<u8>::new(Size::new(40, 30), 1).unwrap();
//! img.fill_rect(icl::Rect::new_unchecked(5, 5, 20, 15), 0, 1).unwrap();
//!
//! let mut detector = RegionDetector::default();
//! detector.detect(&img);
//! let rect = detector.region_at(10, 10).unwrap();
//! assert_eq!(rect.size(), 300);
//! assert_eq!(rect.boundary_corners(&CssParams::default()).len(), 4);
//! ```
//!
//! Detection runs log through the `log` facade; install any logger (for
//! example `env_logger`) to see them.

// Re-export core types (primary data structures used everywhere)
pub use icl_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use icl_region as region;
