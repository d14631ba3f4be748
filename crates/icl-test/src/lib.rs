//! icl-test - Regression test framework for ICL
//!
//! Integration tests are named `*_reg.rs` and report through [`RegParams`]:
//!
//! ```ignore
//! use icl_test::{RegParams, load_test_image};
//!
//! let img = load_test_image("frame.txt").unwrap();
//! let mut rp = RegParams::new("frame");
//! rp.compare_values(2.0, regions.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! Test images are small ASCII grids under `tests/data/images`: one row
//! per line, one decimal digit per pixel. Whitespace is ignored and lines
//! starting with `#` are comments.
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"
//! - `RUST_LOG`: Log filter for the installed test logger

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use icl_core::{Img, Size};

/// Load an ASCII test image from the test data directory
pub fn load_test_image(name: &str) -> TestResult<Img<u8>> {
    let path = test_data_path(name);
    let text = std::fs::read_to_string(&path)?;
    parse_ascii_image(&text).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Parse an ASCII digit grid into a single-channel image
///
/// All rows must have the same number of pixels.
pub fn parse_ascii_image(text: &str) -> TestResult<Img<u8>> {
    let mut data = Vec::new();
    let mut width = None;
    let mut height = 0u32;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row: Vec<u8> = line
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                c.to_digit(10).map(|d| d as u8).ok_or_else(|| TestError::Parse {
                    line: lineno + 1,
                    message: format!("'{}' is not a digit", c),
                })
            })
            .collect::<TestResult<_>>()?;

        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(TestError::Parse {
                    line: lineno + 1,
                    message: format!("expected {} pixels, got {}", w, row.len()),
                });
            }
            Some(_) => {}
        }
        data.extend(row);
        height += 1;
    }

    let width = width.ok_or_else(|| TestError::Parse {
        line: 0,
        message: "empty image".to_string(),
    })?;
    Img::from_data(Size::new(width as u32, height), data).map_err(|e| TestError::Parse {
        line: 0,
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // icl-test is at crates/icl-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/images/{}", workspace_root(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ascii_image() {
        let img = parse_ascii_image("# comment\n012\n3 4 5\n\n").unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.get(2, 1, 0), Some(5));
        assert_eq!(img.get(0, 0, 0), Some(0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_ascii_image("01\n012\n"),
            Err(TestError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_ascii_image("0x\n"),
            Err(TestError::Parse { line: 1, .. })
        ));
        assert!(parse_ascii_image("# nothing\n").is_err());
    }

    #[test]
    fn test_load_fixture() {
        let img = load_test_image("frame.txt").unwrap();
        assert_eq!(img.channels(), 1);
        assert!(load_test_image("missing.txt").is_err());
    }
}
