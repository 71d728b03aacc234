//! Errors reported synchronously by container operations.

use thiserror::Error;

/// Failure of a bounds or uniqueness check.
///
/// Every operation that returns this error leaves its container untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cell ({x}, {y}) is outside a {width}x{height} grid")]
    CellOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("an item with the same key already exists")]
    DuplicateKey,

    #[error("an item with the same value already exists in the set")]
    DuplicateValue,

    #[error("grid dimensions {width}x{height} overflow the addressable cell count")]
    InvalidDimension { width: usize, height: usize },

    #[error("date/time arithmetic left the supported 1..=9999 year range")]
    DateOutOfRange,
}
