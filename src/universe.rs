//! Universe-size arithmetic.
//!
//! A universe of size `U = 2^k` splits into `upper_sqrt(U)` clusters of
//! `lower_sqrt(U)` values each. A value `v` lives in cluster `high(v, U)` at
//! offset `low(v, U)`, and `index` puts the two halves back together.
//!
//! Every function here expects `universe` to be a power of two `>= 2`, so the
//! square roots are exact and the split reduces to shifts and masks.

#[inline]
fn log2(universe: u64) -> u32 {
    debug_assert!(universe >= 2 && universe.is_power_of_two());
    universe.trailing_zeros()
}

/// `2^ceil(log2(U) / 2)`: the number of clusters.
#[inline]
pub fn upper_sqrt(universe: u64) -> u64 {
    1u64 << log2(universe).div_ceil(2)
}

/// `2^floor(log2(U) / 2)`: the universe size of each cluster.
#[inline]
pub fn lower_sqrt(universe: u64) -> u64 {
    1u64 << (log2(universe) / 2)
}

/// Cluster index of `value`.
#[inline]
pub fn high(value: u64, universe: u64) -> u64 {
    value >> (log2(universe) / 2)
}

/// Offset of `value` within its cluster.
#[inline]
pub fn low(value: u64, universe: u64) -> u64 {
    value & (lower_sqrt(universe) - 1)
}

/// Inverse of the `high`/`low` split.
#[inline]
pub fn index(high: u64, low: u64, universe: u64) -> u64 {
    debug_assert!(low < lower_sqrt(universe));
    (high << (log2(universe) / 2)) | low
}
