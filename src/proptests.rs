use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

const BITS: u32 = 7;

fn validate_tree(t: &VebTree) {
    let members = t.root.check_invariants();
    assert_eq!(members.len(), t.len(), "live count must match stored elements");
    assert_eq!(t.min(), members.first().copied());
    assert_eq!(t.max(), members.last().copied());
    assert_eq!(t.to_vec(), members, "ordered walk must visit every element");

    for pair in members.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a < b, "ordered walk must be strictly ascending");
        assert_eq!(t.successor(a), Ok(Some(b)));
        assert_eq!(t.predecessor(b), Ok(Some(a)));
    }
    if let (Some(min), Some(max)) = (t.min(), t.max()) {
        assert_eq!(t.successor(max), Ok(None));
        assert_eq!(t.predecessor(min), Ok(None));
    }
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "0u64..(1 << BITS)")] u64),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "0u64..(1 << BITS)")] u64),
    #[proptest(weight = 10)]
    Contains(#[proptest(strategy = "0u64..(1 << BITS)")] u64),
    #[proptest(weight = 7)]
    Successor(#[proptest(strategy = "0u64..(1 << BITS)")] u64),
    #[proptest(weight = 7)]
    Predecessor(#[proptest(strategy = "0u64..(1 << BITS)")] u64),
    #[proptest(weight = 1)]
    Clear,
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=2000)) {
        let mut t = VebTree::new(BITS).unwrap();
        let mut m: BTreeSet<u64> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    prop_assert_eq!(t.insert(v), Ok(m.insert(v)));
                }
                Op::Remove(v) => {
                    prop_assert_eq!(t.remove(v), Ok(m.remove(&v)));
                }
                Op::Contains(v) => {
                    prop_assert_eq!(t.contains(v), Ok(m.contains(&v)));
                }
                Op::Successor(v) => {
                    prop_assert_eq!(t.successor(v), Ok(m.range(v + 1..).next().copied()));
                }
                Op::Predecessor(v) => {
                    prop_assert_eq!(t.predecessor(v), Ok(m.range(..v).next_back().copied()));
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let expected: Vec<u64> = m.iter().copied().collect();
        prop_assert_eq!(t.to_vec(), expected);
    }

    #[test]
    fn prop_insert_then_remove_restores(
        bits in 1u32..=10,
        seed in prop::collection::btree_set(any::<u64>(), 0..64),
        v in any::<u64>(),
    ) {
        let universe = 1u64 << bits;
        let mut t = VebTree::new(bits).unwrap();
        for s in &seed {
            t.insert(s % universe).unwrap();
        }
        let v = v % universe;
        let before = t.to_vec();
        let len = t.len();
        let was_present = t.contains(v).unwrap();

        t.insert(v).unwrap();
        prop_assert!(t.contains(v).unwrap());
        let after_insert = t.to_vec();
        prop_assert_eq!(t.insert(v), Ok(false));
        prop_assert_eq!(t.to_vec(), after_insert);

        if !was_present {
            prop_assert_eq!(t.remove(v), Ok(true));
            prop_assert!(!t.contains(v).unwrap());
            prop_assert_eq!(t.len(), len);
            prop_assert_eq!(t.to_vec(), before);
        }
        validate_tree(&t);
    }

    #[test]
    fn prop_out_of_range_is_rejected(bits in 1u32..=12, v in any::<u64>()) {
        let mut t = VebTree::new(bits).unwrap();
        let universe = 1u64 << bits;
        prop_assume!(v >= universe);
        let err = VebError::OutOfRange { value: v, universe };
        prop_assert_eq!(t.insert(v), Err(err));
        prop_assert_eq!(t.remove(v), Err(err));
        prop_assert_eq!(t.contains(v), Err(err));
        prop_assert!(t.is_empty());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

// Values spread over several clusters, including both ends of the universe.
const SMALL_SET: [u64; 6] = [0, 1, 5, 6, 11, 15];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = VebTree::new(4).unwrap();
        for v in perm {
            assert_eq!(t.insert(v), Ok(true));
            validate_tree(&t);
        }
        assert_eq!(t.to_vec(), SMALL_SET.to_vec());
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base = VebTree::new(4).unwrap();
    for v in SMALL_SET {
        base.insert(v).unwrap();
    }

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        let mut m: BTreeSet<u64> = SMALL_SET.into_iter().collect();

        for v in perm {
            assert_eq!(t.remove(v), Ok(m.remove(&v)));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }
        assert!(t.is_empty());
        assert_eq!(t.min(), None);
    });
}
