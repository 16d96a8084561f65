//! Property-based tests for proof construction and verification.

use proptest::prelude::*;

use crate::{FlyClientConfig, ProofBuilder, ProofElement, ProofVerifier};
use flyclient_core::{Hash, Weight};
use flyclient_mmr::Accumulator;

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Generate a chain of leaves with positive weights.
fn arb_chain(max_len: usize) -> impl Strategy<Value = Vec<(Hash, Weight)>> {
    prop::collection::vec(
        (prop::array::uniform32(any::<u8>()), 1u64..10_000)
            .prop_map(|(bytes, w)| (Hash::from_bytes(bytes), Weight::from(w))),
        1..max_len,
    )
}

/// Low security keeps sample counts small enough for many cases.
fn config() -> FlyClientConfig {
    FlyClientConfig::builder()
        .lambda(10)
        .checkpoint_interval(8)
        .max_checkpoints(3)
        .build()
}

fn build(leaves: &[(Hash, Weight)]) -> Accumulator {
    let mut acc = Accumulator::in_memory();
    acc.append_batch(leaves).expect("append should succeed");
    acc
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Honest proofs always verify
    #[test]
    fn prop_round_trip(leaves in arb_chain(70), tail in 1u64..5_000) {
        let acc = build(&leaves);
        let tail = Weight::from(tail);
        let proof = ProofBuilder::new(config()).unwrap().prove(&acc, &tail).unwrap();
        prop_assert!(ProofVerifier::new(config()).unwrap().verify(&proof, &tail).unwrap());
    }

    /// Flipping any bit of any element hash is detected
    #[test]
    fn prop_bit_flip_detected(
        leaves in arb_chain(40),
        element in any::<prop::sample::Index>(),
        bit in 0usize..256,
    ) {
        let acc = build(&leaves);
        let tail = Weight::from(100u32);
        let mut proof = ProofBuilder::new(config()).unwrap().prove(&acc, &tail).unwrap();

        let i = element.index(proof.elements.len());
        let (ProofElement::Leaf { hash, .. }
        | ProofElement::Sibling { hash, .. }
        | ProofElement::Root { hash, .. }) = &mut proof.elements[i];
        let mut bytes = *hash.as_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        *hash = Hash::from_bytes(bytes);

        prop_assert!(!ProofVerifier::new(config()).unwrap().verify(&proof, &tail).unwrap());
    }

    /// Proofs survive serialization unchanged
    #[test]
    fn prop_serialized_proof_verifies(leaves in arb_chain(40)) {
        let acc = build(&leaves);
        let tail = Weight::from(500u32);
        let proof = ProofBuilder::new(config()).unwrap().prove(&acc, &tail).unwrap();
        let decoded = crate::Proof::from_bytes(&proof.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(&decoded, &proof);
        prop_assert!(ProofVerifier::new(config()).unwrap().verify(&decoded, &tail).unwrap());
    }
}
