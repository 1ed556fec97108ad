//! Recursive vEB node and the five algorithms that operate on it.
//!
//! A node indexes a sub-universe of size `U = 2^k`. Nodes with `U > 2` own
//! `upper_sqrt(U)` child clusters of size `lower_sqrt(U)` plus a summary of size
//! `upper_sqrt(U)` recording which clusters are non-empty. `U == 2` nodes are
//! leaves whose bounds describe membership of `{0, 1}` completely.
//!
//! The node's minimum is kept only in its bounds and never pushed into the
//! clusters. That is what lets an empty cluster be filled (or a singleton
//! cluster be drained) in O(1), and it is why every algorithm below recurses
//! into at most one child and the summary per level.

use crate::universe::{high, index, low, lower_sqrt, upper_sqrt};

// =============================================================================
// Bounds
// =============================================================================

/// Occupancy of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Bounds {
    Empty,
    Singleton(u64),
    /// Two or more elements; `min < max`.
    Range { min: u64, max: u64 },
}

impl Bounds {
    #[inline]
    fn span(min: u64, max: u64) -> Self {
        debug_assert!(min <= max);
        if min == max {
            Bounds::Singleton(min)
        } else {
            Bounds::Range { min, max }
        }
    }

    #[inline]
    fn min_max(self) -> Option<(u64, u64)> {
        match self {
            Bounds::Empty => None,
            Bounds::Singleton(v) => Some((v, v)),
            Bounds::Range { min, max } => Some((min, max)),
        }
    }

    #[inline]
    pub(crate) fn min(self) -> Option<u64> {
        self.min_max().map(|(min, _)| min)
    }

    #[inline]
    pub(crate) fn max(self) -> Option<u64> {
        self.min_max().map(|(_, max)| max)
    }
}

// =============================================================================
// Node
// =============================================================================

#[derive(Clone)]
pub(crate) struct Node {
    universe: u64,
    bounds: Bounds,
    /// `None` iff `universe == 2`.
    clusters: Option<Box<Clusters>>,
}

#[derive(Clone)]
struct Clusters {
    summary: Node,
    children: Box<[Node]>,
}

impl Clusters {
    #[inline]
    fn child(&self, idx: u64) -> &Node {
        &self.children[idx as usize]
    }

    /// Smallest element stored below the owning node: the next minimum once the
    /// current one is removed.
    fn first(&self, universe: u64) -> Option<u64> {
        let idx = self.summary.min()?;
        let offset = self.child(idx).min()?;
        Some(index(idx, offset, universe))
    }

    /// Largest element stored below the owning node.
    fn last(&self, universe: u64) -> Option<u64> {
        let idx = self.summary.max()?;
        let offset = self.child(idx).max()?;
        Some(index(idx, offset, universe))
    }

    /// Pushes `value` (already known to be absent, and not the owning node's
    /// minimum) into its cluster.
    fn insert(&mut self, value: u64, universe: u64) {
        let (hi, lo) = (high(value, universe), low(value, universe));
        let child = &mut self.children[hi as usize];
        if child.is_empty() {
            // A singleton cluster is described by its bounds alone.
            self.summary.insert(hi);
            child.bounds = Bounds::Singleton(lo);
        } else {
            child.insert(lo);
        }
    }
}

impl Node {
    /// Builds the complete shape for `universe` up front. No node is allocated or
    /// freed after this returns.
    pub(crate) fn new(universe: u64) -> Self {
        debug_assert!(universe >= 2 && universe.is_power_of_two());
        let clusters = (universe > 2).then(|| {
            let count = upper_sqrt(universe);
            let child_universe = lower_sqrt(universe);
            Box::new(Clusters {
                summary: Node::new(count),
                children: (0..count).map(|_| Node::new(child_universe)).collect(),
            })
        });
        Self {
            universe,
            bounds: Bounds::Empty,
            clusters,
        }
    }

    #[inline]
    pub(crate) fn min(&self) -> Option<u64> {
        self.bounds.min()
    }

    #[inline]
    pub(crate) fn max(&self) -> Option<u64> {
        self.bounds.max()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.bounds == Bounds::Empty
    }

    /// Number of nodes in the shape rooted here, this one included.
    pub(crate) fn node_count(&self) -> usize {
        match self.clusters.as_deref() {
            None => 1,
            Some(c) => {
                1 + c.summary.node_count() + c.children.iter().map(Node::node_count).sum::<usize>()
            }
        }
    }

    /// Heap bytes owned by the shape rooted here (excluding this node itself).
    pub(crate) fn heap_bytes(&self) -> usize {
        match self.clusters.as_deref() {
            None => 0,
            Some(c) => {
                std::mem::size_of::<Clusters>()
                    + c.children.len() * std::mem::size_of::<Node>()
                    + c.summary.heap_bytes()
                    + c.children.iter().map(Node::heap_bytes).sum::<usize>()
            }
        }
    }

    pub(crate) fn contains(&self, value: u64) -> bool {
        match self.bounds {
            Bounds::Empty => false,
            Bounds::Singleton(v) => v == value,
            Bounds::Range { min, max } => {
                if value == min || value == max {
                    return true;
                }
                match self.clusters.as_deref() {
                    None => false,
                    Some(c) => c
                        .child(high(value, self.universe))
                        .contains(low(value, self.universe)),
                }
            }
        }
    }

    /// Adds `value`. The caller must have checked that it is absent.
    pub(crate) fn insert(&mut self, value: u64) {
        debug_assert!(value < self.universe);
        let Some((mut min, max)) = self.bounds.min_max() else {
            self.bounds = Bounds::Singleton(value);
            return;
        };
        debug_assert!(value != min && value != max, "{value} already present");

        // The new value takes over as minimum and the old minimum goes below.
        let mut value = value;
        if value < min {
            std::mem::swap(&mut value, &mut min);
        }
        if let Some(clusters) = self.clusters.as_deref_mut() {
            clusters.insert(value, self.universe);
        }
        self.bounds = Bounds::span(min, max.max(value));
    }

    /// Removes `value`. The caller must have checked that it is present.
    pub(crate) fn remove(&mut self, value: u64) {
        debug_assert!(value < self.universe);
        let (mut min, mut max) = match self.bounds {
            Bounds::Empty => {
                debug_assert!(false, "remove {value} from empty node");
                return;
            }
            Bounds::Singleton(v) => {
                debug_assert_eq!(v, value);
                self.bounds = Bounds::Empty;
                return;
            }
            Bounds::Range { min, max } => (min, max),
        };

        let universe = self.universe;
        let Some(clusters) = self.clusters.as_deref_mut() else {
            // Leaf holding both 0 and 1.
            self.bounds = Bounds::Singleton(value ^ 1);
            return;
        };

        let mut value = value;
        if value == min {
            // Promote the first stored element; it is then removed from below.
            let next = clusters
                .first(universe)
                .expect("range node must have a non-empty substructure");
            min = next;
            value = next;
        }

        let (hi, lo) = (high(value, universe), low(value, universe));
        let child = &mut clusters.children[hi as usize];
        child.remove(lo);
        if child.is_empty() {
            clusters.summary.remove(hi);
            if value == max {
                max = clusters.last(universe).unwrap_or(min);
            }
        } else if value == max {
            let offset = child.max().expect("non-empty cluster has a max");
            max = index(hi, offset, universe);
        }
        self.bounds = Bounds::span(min, max);
    }

    /// Smallest stored element strictly greater than `value`.
    pub(crate) fn successor(&self, value: u64) -> Option<u64> {
        let Some(clusters) = self.clusters.as_deref() else {
            return (value == 0 && self.max() == Some(1)).then_some(1);
        };
        let min = self.min()?;
        if value < min {
            return Some(min);
        }

        let universe = self.universe;
        let (hi, lo) = (high(value, universe), low(value, universe));
        let child = clusters.child(hi);
        if child.max().is_some_and(|max| lo < max) {
            return child
                .successor(lo)
                .map(|offset| index(hi, offset, universe));
        }
        let next = clusters.summary.successor(hi)?;
        clusters
            .child(next)
            .min()
            .map(|offset| index(next, offset, universe))
    }

    /// Largest stored element strictly less than `value`.
    pub(crate) fn predecessor(&self, value: u64) -> Option<u64> {
        let Some(clusters) = self.clusters.as_deref() else {
            return (value == 1 && self.min() == Some(0)).then_some(0);
        };
        let (min, max) = self.bounds.min_max()?;
        if max < value {
            return Some(max);
        }

        let universe = self.universe;
        let (hi, lo) = (high(value, universe), low(value, universe));
        let child = clusters.child(hi);
        if child.min().is_some_and(|min| min < lo) {
            return child
                .predecessor(lo)
                .map(|offset| index(hi, offset, universe));
        }
        if let Some(prev) = clusters.summary.predecessor(hi) {
            return clusters
                .child(prev)
                .max()
                .map(|offset| index(prev, offset, universe));
        }
        // The minimum lives only in this node's bounds.
        (min < value).then_some(min)
    }

    /// Walks the whole shape asserting every structural invariant and returns the
    /// stored elements in ascending order.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Vec<u64> {
        let universe = self.universe;
        let Some(c) = self.clusters.as_deref() else {
            assert_eq!(universe, 2, "only size-2 nodes may be leaves");
            return match self.bounds {
                Bounds::Empty => Vec::new(),
                Bounds::Singleton(v) => {
                    assert!(v < 2, "leaf value {v} out of range");
                    vec![v]
                }
                Bounds::Range { min, max } => {
                    assert_eq!((min, max), (0, 1), "leaf range must be (0, 1)");
                    vec![0, 1]
                }
            };
        };

        assert!(universe > 2);
        assert_eq!(c.summary.universe, upper_sqrt(universe));
        assert_eq!(c.children.len() as u64, upper_sqrt(universe));

        let occupied = c.summary.check_invariants();
        let mut below = Vec::new();
        for (i, child) in c.children.iter().enumerate() {
            assert_eq!(child.universe, lower_sqrt(universe));
            let members = child.check_invariants();
            assert_eq!(
                !members.is_empty(),
                occupied.binary_search(&(i as u64)).is_ok(),
                "summary must track occupancy of cluster {i}"
            );
            below.extend(members.into_iter().map(|lo| index(i as u64, lo, universe)));
        }

        match self.bounds {
            Bounds::Empty => {
                assert!(below.is_empty(), "empty node with stored elements");
                below
            }
            Bounds::Singleton(v) => {
                assert!(v < universe);
                assert!(below.is_empty(), "singleton node must have an empty substructure");
                vec![v]
            }
            Bounds::Range { min, max } => {
                assert!(min < max && max < universe);
                assert!(
                    below.first().is_some_and(|&first| first > min),
                    "min must be smallest and not stored below"
                );
                assert_eq!(below.last(), Some(&max), "max must be stored below");
                let mut all = Vec::with_capacity(below.len() + 1);
                all.push(min);
                all.extend(below);
                all
            }
        }
    }
}
