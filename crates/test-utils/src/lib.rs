//! Shared test utilities for the report-table workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data and font path helpers
//! - Skip macros for optional test assets
//! - Synthetic record generators
//! - Common record and header fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_test_file, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// Useful for tests that want a real TrueType font or banner asset that may
/// not be present in every environment.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_with_real_font() {
///     let path = require_test_file!("DejaVuSans.ttf");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Add it to testdata/ or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro to skip a test when no TrueType font can be found on this machine.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_font;
///
/// #[test]
/// fn test_truetype_text() {
///     let font_path = require_font!();
/// }
/// ```
#[macro_export]
macro_rules! require_font {
    () => {{
        match $crate::find_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: no TrueType font found. Set TEST_FONT to a .ttf/.otf file.");
                return;
            }
        }
    }};
}

/// Assert that a pixel of an RGB image has the given color.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_rgb;
///
/// assert_rgb!(img, 5, 5, style.header_color);
/// ```
#[macro_export]
macro_rules! assert_rgb {
    ($img:expr, $x:expr, $y:expr, $color:expr) => {{
        let actual = $img.get_pixel($x, $y).0;
        let expected: [u8; 3] = $color.to_array();
        if actual != expected {
            panic!(
                "pixel mismatch at ({}, {})\n  actual: `{:?}`,\n expected: `{:?}`",
                $x, $y, actual, expected
            );
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
