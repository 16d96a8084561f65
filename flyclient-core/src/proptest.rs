//! Property-based tests for core primitives.
//!
//! Uses proptest to verify invariants hold for arbitrary inputs.

use proptest::prelude::*;

use crate::algebra::{combine, seed_hash, seed_to_unit_float};
use crate::crypto::Hash;
use crate::encoding::{biguint_bytes, encode_list, RlpItem, RlpReader};
use crate::weight::{weight_from_f64, weight_to_f64, Weight};

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Generate arbitrary Hash values.
fn arb_hash() -> impl Strategy<Value = Hash> {
    prop::array::uniform32(any::<u8>()).prop_map(Hash::from_bytes)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Unit floats stay in [0, 1)
    #[test]
    fn prop_unit_float_in_range(h in arb_hash()) {
        let y = seed_to_unit_float(&h);
        prop_assert!((0.0..1.0).contains(&y));
    }

    /// Seeds are a pure function of (root, index)
    #[test]
    fn prop_seed_deterministic(root in arb_hash(), i in any::<u64>()) {
        prop_assert_eq!(seed_hash(&root, i), seed_hash(&root, i));
    }

    /// Combining distinct hashes depends on argument order
    #[test]
    fn prop_combine_ordered(a in arb_hash(), b in arb_hash()) {
        prop_assume!(a != b);
        prop_assert_ne!(combine(&a, &b), combine(&b, &a));
    }

    /// Hex encoding is reversible
    #[test]
    fn prop_hex_roundtrip(h in arb_hash()) {
        prop_assert_eq!(Hash::from_hex(&h.to_hex()).unwrap(), h);
    }

    /// Encoded (hash, weight) lists decode to the same values
    #[test]
    fn prop_rlp_fields_roundtrip(h in arb_hash(), w in any::<u128>(), n in any::<u64>()) {
        let weight = Weight::from(w);
        let weight_bytes = biguint_bytes(&weight);
        let enc = encode_list(&[
            RlpItem::Bytes(h.as_bytes()),
            RlpItem::Bytes(&weight_bytes),
            RlpItem::Uint(n),
        ]);
        let mut reader = RlpReader::new(&enc).unwrap();
        prop_assert_eq!(reader.hash().unwrap(), h);
        prop_assert_eq!(reader.biguint().unwrap(), weight);
        prop_assert_eq!(reader.uint().unwrap(), n);
        prop_assert!(reader.finish().is_ok());
    }

    /// Weights below 2^53 survive the float conversion exactly
    #[test]
    fn prop_weight_f64_exact(w in 0u64..(1u64 << 53)) {
        let weight = Weight::from(w);
        prop_assert_eq!(weight_from_f64(weight_to_f64(&weight)), weight);
    }
}
