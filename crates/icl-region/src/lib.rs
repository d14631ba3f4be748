//! icl-region - Connected-component region detection for ICL
//!
//! This crate partitions the region of interest of a single-channel image
//! into maximal 4-connected regions of equal pixels:
//!
//! - **Labeling** - One row-major pass building scanline runs and merging
//!   them with a union-find over region parts
//! - **Extraction** - Regions with value and size filters
//! - **Region graph** - Neighbours, border flags and the nesting forest
//! - **Region features** - Bounding box, center of gravity, boundary,
//!   PCA and curvature scale space corners, computed on demand
//!
//! # Examples
//!
//! ```
//! use icl_core::{Img, Size};
//! use icl_region::{RegionDetector, RegionDetectorOptions};
//!
//! // 5x5 image: a frame of 0 around a 3x3 block of 1
//! let mut data = vec![0u8; 25];
//! for y in 1..4 {
//!     for x in 1..4 {
//!         data[y * 5 + x] = 1;
//!     }
//! }
//! let img = Img::from_data(Size::new(5, 5), data).unwrap();
//!
//! let mut detector = RegionDetector::new(RegionDetectorOptions::new().with_build_graph(true));
//! let regions = detector.detect(&img);
//! assert_eq!(regions.len(), 2);
//!
//! let block = detector.region_at(2, 2).unwrap();
//! assert_eq!(block.size(), 9);
//! assert!(!block.is_border_region().unwrap());
//! assert_eq!(block.parent_region().unwrap().unwrap().value(), 0.0);
//! ```

mod boundary;
pub mod css;
mod detector;
pub mod error;
mod features;
mod graph;
mod labeling;
mod part;
mod region;
mod scanline;

// Re-export core types
pub use icl_core;

pub use boundary::Direction;
pub use css::{CssCorner, CssParams, detect_corners};
pub use detector::{RegionDetector, RegionDetectorOptions};
pub use error::{RegionError, RegionResult};
pub use features::PcaInfo;
pub use region::{Region, RegionSnapshot, RegionView};
pub use scanline::ScanLine;
