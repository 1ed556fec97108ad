//! Error types for veb-set.

use thiserror::Error;

/// Result type alias using VebError.
pub type Result<T> = std::result::Result<T, VebError>;

/// Errors returned by [`VebTree`](crate::VebTree) operations.
///
/// Both kinds are raised before the tree is touched, so a failed call never
/// leaves a partially updated structure behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VebError {
    #[error("invalid universe exponent {bits}: must be in 1..={max}")]
    InvalidUniverse { bits: u32, max: u32 },

    #[error("value {value} out of range for universe of size {universe}")]
    OutOfRange { value: u64, universe: u64 },
}
