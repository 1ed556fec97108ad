//! # veb-set
//!
//! An ordered set of integers over a fixed universe `[0, 2^k)` backed by a
//! van Emde Boas tree.
//!
//! Membership, insertion, removal, successor and predecessor all run in
//! `O(log log U)`; minimum and maximum are `O(1)`. The whole recursive shape
//! is allocated when the tree is built, so nothing allocates afterwards.
//!
//! ## Example
//!
//! ```rust
//! use veb_set::VebTree;
//!
//! let mut tree = VebTree::new(3)?; // universe [0, 8)
//! for v in [2, 5, 0, 7] {
//!     tree.insert(v)?;
//! }
//!
//! assert_eq!(tree.min(), Some(0));
//! assert_eq!(tree.max(), Some(7));
//! assert_eq!(tree.successor(2)?, Some(5));
//! assert_eq!(tree.predecessor(5)?, Some(2));
//! assert_eq!(tree.to_vec(), vec![0, 2, 5, 7]);
//! # Ok::<(), veb_set::VebError>(())
//! ```

#![forbid(unsafe_code)]

use std::iter::FusedIterator;

use log::{debug, trace};

mod error;
mod node;
pub mod universe;

pub use error::{Result, VebError};

use node::Node;

// =============================================================================
// Configuration
// =============================================================================

/// Largest accepted universe exponent. The full shape is built eagerly, so the
/// footprint grows linearly with the universe size.
pub const MAX_UNIVERSE_BITS: u32 = 32;

// =============================================================================
// VebTree
// =============================================================================

/// An ordered set of `u64` values in `[0, 2^bits)`.
///
/// Not safe for concurrent mutation; wrap the whole tree in a lock if it
/// has to be shared.
#[derive(Clone)]
pub struct VebTree {
    root: Node,
    bits: u32,
    count: usize,
    node_count: usize,
    heap_bytes: usize,
}

impl VebTree {
    /// Builds an empty tree over the universe `[0, 2^bits)`.
    ///
    /// Fails with [`VebError::InvalidUniverse`] if `bits` is zero or larger
    /// than [`MAX_UNIVERSE_BITS`].
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_UNIVERSE_BITS {
            debug!("rejecting universe exponent {bits}");
            return Err(VebError::InvalidUniverse {
                bits,
                max: MAX_UNIVERSE_BITS,
            });
        }

        let universe = 1u64 << bits;
        let root = Node::new(universe);
        let node_count = root.node_count();
        let heap_bytes = root.heap_bytes();
        debug!("built vEB tree: universe=2^{bits}, nodes={node_count}, heap_bytes={heap_bytes}");

        Ok(Self {
            root,
            bits,
            count: 0,
            node_count,
            heap_bytes,
        })
    }

    /// Size of the universe, `2^bits`.
    #[inline]
    pub fn universe(&self) -> u64 {
        1u64 << self.bits
    }

    #[inline]
    pub fn universe_bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes in the eagerly built shape.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Approximate bytes held by the tree. Constant for a given universe.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.heap_bytes
    }

    #[inline]
    fn check(&self, value: u64) -> Result<()> {
        if value < self.universe() {
            Ok(())
        } else {
            debug!("value {value} outside universe {}", self.universe());
            Err(VebError::OutOfRange {
                value,
                universe: self.universe(),
            })
        }
    }

    /// Adds `value`. Returns `false` if it was already present.
    pub fn insert(&mut self, value: u64) -> Result<bool> {
        self.check(value)?;
        if self.root.contains(value) {
            trace!("insert {value}: already present");
            return Ok(false);
        }
        self.root.insert(value);
        self.count += 1;
        Ok(true)
    }

    /// Removes `value`. Returns `false` if it was not present.
    pub fn remove(&mut self, value: u64) -> Result<bool> {
        self.check(value)?;
        if !self.root.contains(value) {
            trace!("remove {value}: not present");
            return Ok(false);
        }
        self.root.remove(value);
        self.count -= 1;
        Ok(true)
    }

    pub fn contains(&self, value: u64) -> Result<bool> {
        self.check(value)?;
        Ok(self.root.contains(value))
    }

    #[inline]
    pub fn min(&self) -> Option<u64> {
        self.root.min()
    }

    #[inline]
    pub fn max(&self) -> Option<u64> {
        self.root.max()
    }

    /// Smallest element strictly greater than `value`. `value` itself need not
    /// be present.
    pub fn successor(&self, value: u64) -> Result<Option<u64>> {
        self.check(value)?;
        Ok(self.root.successor(value))
    }

    /// Largest element strictly less than `value`. `value` itself need not be
    /// present.
    pub fn predecessor(&self, value: u64) -> Result<Option<u64>> {
        self.check(value)?;
        Ok(self.root.predecessor(value))
    }

    /// Removes every element. The shape stays allocated.
    pub fn clear(&mut self) {
        while let Some(min) = self.root.min() {
            self.root.remove(min);
        }
        self.count = 0;
    }

    /// All elements in ascending order.
    pub fn to_vec(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.count);
        out.extend(self.iter());
        out
    }

    /// Ascending iterator, stepping from the minimum by successor queries.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            next: self.root.min(),
            remaining: self.count,
        }
    }
}

impl PartialEq for VebTree {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.count == other.count && self.iter().eq(other.iter())
    }
}

impl Eq for VebTree {}

impl std::fmt::Debug for VebTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a VebTree {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    tree: &'a VebTree,
    next: Option<u64>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.root.successor(current);
        self.remaining = self.remaining.saturating_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}


#[cfg(test)]
mod proptests;
