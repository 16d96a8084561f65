//! Property-based tests for accumulator operations.
//!
//! Tests invariants of the weighted Merkle Mountain Range under arbitrary
//! appends and removals.

use proptest::prelude::*;

use crate::position::{leaf_to_pos, size_for_leaves};
use crate::Accumulator;
use flyclient_core::{Hash, Weight};

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Generate arbitrary (hash, weight) leaves.
fn arb_leaf() -> impl Strategy<Value = (Hash, Weight)> {
    (prop::array::uniform32(any::<u8>()), 0u64..1_000_000)
        .prop_map(|(bytes, w)| (Hash::from_bytes(bytes), Weight::from(w)))
}

/// Generate a vector of arbitrary leaves.
fn arb_leaves(max_count: usize) -> impl Strategy<Value = Vec<(Hash, Weight)>> {
    prop::collection::vec(arb_leaf(), 0..max_count)
}

fn build(leaves: &[(Hash, Weight)]) -> Accumulator {
    let mut acc = Accumulator::in_memory();
    acc.append_batch(leaves).expect("append should succeed");
    acc
}

// ============================================================================
// Property Tests: Structure
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Size is 2n - popcount(n) and there are popcount(n) peaks
    #[test]
    fn prop_size_and_peak_count(leaves in arb_leaves(150)) {
        let acc = build(&leaves);
        let n = leaves.len() as u64;
        prop_assert_eq!(acc.size(), size_for_leaves(n));
        prop_assert_eq!(acc.peaks().unwrap().len() as u32, n.count_ones());
    }

    /// Root weight is the exact sum of leaf weights
    #[test]
    fn prop_root_weight_is_sum(leaves in arb_leaves(150)) {
        prop_assume!(!leaves.is_empty());
        let acc = build(&leaves);
        let total: Weight = leaves.iter().map(|(_, w)| w.clone()).sum();
        prop_assert_eq!(acc.root_weight().unwrap(), Some(total));
    }

    /// Same leaves in the same order give the same root
    #[test]
    fn prop_root_deterministic(leaves in arb_leaves(100)) {
        prop_assert_eq!(build(&leaves).root_hash().unwrap(), build(&leaves).root_hash().unwrap());
    }

    /// Leaves are stored at leaf_to_pos(i)
    #[test]
    fn prop_leaf_positions(leaves in arb_leaves(100)) {
        let acc = build(&leaves);
        for (i, (h, w)) in leaves.iter().enumerate() {
            let node = acc.leaf(i as u64).unwrap();
            prop_assert_eq!(node.position, leaf_to_pos(i as u64));
            prop_assert_eq!(&node.hash, h);
            prop_assert_eq!(&node.weight, w);
        }
    }
}

// ============================================================================
// Property Tests: Append / Remove
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// remove_last exactly undoes append
    #[test]
    fn prop_push_pop_inverse(leaves in arb_leaves(80), extra in arb_leaf()) {
        let mut acc = build(&leaves);
        let root_before = acc.root_hash().unwrap();
        let size_before = acc.size();
        let peaks_before = acc.peaks().unwrap();

        acc.append(extra.0, extra.1.clone()).unwrap();
        let removed = acc.remove_last().unwrap();

        prop_assert_eq!(removed.hash, extra.0);
        prop_assert_eq!(removed.weight, extra.1);
        prop_assert_eq!(acc.root_hash().unwrap(), root_before);
        prop_assert_eq!(acc.size(), size_before);
        prop_assert_eq!(acc.peaks().unwrap(), peaks_before);
    }

    /// Removing k leaves equals building the prefix directly
    #[test]
    fn prop_remove_matches_prefix(leaves in arb_leaves(80), k in 0usize..80) {
        let k = k.min(leaves.len());
        let mut acc = build(&leaves);
        for _ in 0..k {
            acc.remove_last().unwrap();
        }
        let prefix = build(&leaves[..leaves.len() - k]);
        prop_assert_eq!(acc.root_hash().unwrap(), prefix.root_hash().unwrap());
        prop_assert_eq!(acc.leaf_count(), prefix.leaf_count());
    }

    /// Every leaf has a valid inclusion proof
    #[test]
    fn prop_inclusion_proofs_verify(leaves in arb_leaves(60)) {
        prop_assume!(!leaves.is_empty());
        let acc = build(&leaves);
        let root = acc.root().unwrap().unwrap();
        for i in 0..acc.leaf_count() {
            let proof = acc.inclusion_proof(i).unwrap();
            prop_assert!(proof.verify(&root.hash, &root.weight));
        }
    }

    /// Weighted selection lands on a leaf whose interval holds the threshold
    #[test]
    fn prop_select_leaf_interval(leaves in arb_leaves(60), frac in 0.0f64..1.0) {
        let acc = build(&leaves);
        let total = match acc.root_weight().unwrap() {
            Some(w) if w > Weight::from(0u8) => w,
            _ => return Ok(()),
        };
        let threshold = flyclient_core::weight_from_f64(frac * flyclient_core::weight_to_f64(&total))
            .min(&total - 1u32);
        let index = acc.select_leaf_by_weight(&threshold).unwrap() as usize;

        let before: Weight = leaves[..index].iter().map(|(_, w)| w.clone()).sum();
        let own = &leaves[index].1;
        prop_assert!(before <= threshold);
        prop_assert!(threshold < &before + own);
    }
}
