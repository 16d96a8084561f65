//! End-to-end proof construction and verification.

use flyclient_core::{hash, Weight};
use flyclient_light::sampling::{checkpoint_indices, required_queries};
use flyclient_light::{FlyClientConfig, ProofBuilder, ProofElement, ProofVerifier};
use flyclient_mmr::Accumulator;

fn uniform_chain(n: u64, weight: u64) -> Accumulator {
    let mut acc = Accumulator::in_memory();
    for i in 0..n {
        acc.append(hash(&i.to_be_bytes()), Weight::from(weight)).unwrap();
    }
    acc
}

fn varied_chain(n: u64) -> Accumulator {
    let mut acc = Accumulator::in_memory();
    for i in 0..n {
        let weight = (i * 7919) % 1000 + 1;
        acc.append(hash(&i.to_le_bytes()), Weight::from(weight)).unwrap();
    }
    acc
}

#[test]
fn round_trip_for_every_small_chain() {
    let builder = ProofBuilder::default();
    let verifier = ProofVerifier::default();
    let tail = Weight::from(1000u32);

    for n in 1..=64 {
        let acc = uniform_chain(n, 1000);
        let proof = builder.prove(&acc, &tail).unwrap();
        assert!(verifier.verify(&proof, &tail).unwrap(), "uniform chain of {}", n);

        let acc = varied_chain(n);
        let proof = builder.prove(&acc, &tail).unwrap();
        assert!(verifier.verify(&proof, &tail).unwrap(), "varied chain of {}", n);
    }
}

#[test]
fn round_trip_for_long_chains() {
    let builder = ProofBuilder::default();
    let verifier = ProofVerifier::default();
    let tail = Weight::from(1000u32);

    for n in [100, 200, 500, 1000] {
        let proof = builder.prove(&uniform_chain(n, 1000), &tail).unwrap();
        assert!(verifier.verify(&proof, &tail).unwrap(), "uniform chain of {}", n);

        let proof = builder.prove(&varied_chain(n), &tail).unwrap();
        assert!(verifier.verify(&proof, &tail).unwrap(), "varied chain of {}", n);
    }
}

#[test]
fn single_target_under_left_subtree() {
    let tail = Weight::from(1_000_000u32);
    let proof = ProofBuilder::default()
        .build(&uniform_chain(4, 10), &[1], &tail)
        .unwrap();
    assert_eq!(proof.disclosed_leaves, vec![1]);
    assert!(matches!(
        proof.elements.as_slice(),
        [
            ProofElement::Sibling { is_right: false, .. },
            ProofElement::Leaf { .. },
            ProofElement::Sibling { is_right: true, .. },
            ProofElement::Root { .. },
        ]
    ));
    assert!(ProofVerifier::default().verify(&proof, &tail).unwrap());
}

#[test]
fn every_single_target_verifies() {
    let builder = ProofBuilder::default();
    let verifier = ProofVerifier::default();
    let tail = Weight::from(1_000_000u32);

    for n in [4u64, 7, 11, 16, 33] {
        let acc = uniform_chain(n, 10);
        for target in 0..n {
            let proof = builder.build(&acc, &[target], &tail).unwrap();
            assert!(
                verifier.verify(&proof, &tail).unwrap(),
                "leaf {} of {}",
                target,
                n
            );
        }
    }
}

#[test]
fn eleven_leaf_scenario() {
    let acc = uniform_chain(11, 1000);
    let tail = Weight::from(1000u32);
    let config = FlyClientConfig::default();

    let proof = ProofBuilder::default().prove(&acc, &tail).unwrap();
    let required = required_queries(&config, &tail, &proof.root_weight, proof.leaf_count).unwrap();
    assert_eq!(required, 112);
    assert_eq!(proof.queried_leaves.len() as u64, required);

    let verifier = ProofVerifier::default();
    assert!(
        verifier.verify(&proof, &tail).unwrap(),
        "unshifted proof must verify"
    );

    for k in 0..proof.queried_leaves.len() {
        let mut shifted = proof.clone();
        shifted.queried_leaves[k] += 1;
        assert!(
            !verifier.verify(&shifted, &tail).unwrap(),
            "shifted queried leaf {} still verified",
            k
        );
    }
}

#[test]
fn proofs_are_deterministic() {
    let tail = Weight::from(2500u32);
    let a = ProofBuilder::default().prove(&varied_chain(37), &tail).unwrap();
    let b = ProofBuilder::default().prove(&varied_chain(37), &tail).unwrap();
    assert_eq!(a, b);
}

#[test]
fn build_with_explicit_targets_verifies() {
    let acc = varied_chain(50);
    let tail = Weight::from(1000u32);
    let proof = ProofBuilder::default()
        .build(&acc, &[0, 1, 17, 49], &tail)
        .unwrap();

    assert!(proof.leaf_elements() >= 4);
    assert!(ProofVerifier::default().verify(&proof, &tail).unwrap());
}

#[test]
fn checkpoints_are_disclosed() {
    let config = FlyClientConfig::builder().checkpoint_interval(10).build();
    let acc = uniform_chain(57, 1000);
    // tail outweighs the chain, so only checkpoints are disclosed
    let tail = Weight::from(100_000u32);

    let builder = ProofBuilder::new(config.clone()).unwrap();
    let proof = builder.prove(&acc, &tail).unwrap();
    assert!(proof.queried_leaves.is_empty());
    assert_eq!(checkpoint_indices(&config, 57), vec![20, 30, 40, 50]);
    assert_eq!(proof.leaf_elements(), 4);

    let verifier = ProofVerifier::new(config).unwrap();
    assert!(verifier.verify(&proof, &tail).unwrap());

    // a verifier expecting other checkpoints finds them missing
    let other = FlyClientConfig::builder().checkpoint_interval(7).build();
    let strict = ProofVerifier::new(other).unwrap();
    assert!(!strict.verify(&proof, &tail).unwrap());
}

#[test]
fn proof_with_checkpoints_and_queries_verifies() {
    let config = FlyClientConfig::builder()
        .lambda(20)
        .checkpoint_interval(16)
        .max_checkpoints(4)
        .build();
    let acc = varied_chain(200);
    let tail = Weight::from(300u32);

    let proof = ProofBuilder::new(config.clone())
        .unwrap()
        .prove(&acc, &tail)
        .unwrap();
    assert!(!proof.queried_leaves.is_empty());
    assert_eq!(checkpoint_indices(&config, 200).len(), 4);
    assert!(ProofVerifier::new(config).unwrap().verify(&proof, &tail).unwrap());
}

#[test]
fn snapshot_proof_unaffected_by_later_appends() {
    let mut acc = uniform_chain(20, 1000);
    let snapshot = acc.snapshot();
    for i in 20..30u64 {
        acc.append(hash(&i.to_be_bytes()), Weight::from(1000u32)).unwrap();
    }

    let tail = Weight::from(1000u32);
    let proof = ProofBuilder::default().prove(&snapshot, &tail).unwrap();
    assert_eq!(proof.leaf_count, 20);
    assert!(ProofVerifier::default().verify(&proof, &tail).unwrap());
}

#[test]
fn serialized_proof_verifies() {
    let acc = varied_chain(33);
    let tail = Weight::from(1000u32);
    let proof = ProofBuilder::default().prove(&acc, &tail).unwrap();

    let json = proof.to_json().unwrap();
    let from_json = flyclient_light::Proof::from_json(&json).unwrap();
    let from_bytes = flyclient_light::Proof::from_bytes(&proof.to_bytes().unwrap()).unwrap();

    let verifier = ProofVerifier::default();
    assert!(verifier.verify(&from_json, &tail).unwrap());
    assert!(verifier.verify(&from_bytes, &tail).unwrap());
    assert!(matches!(
        from_json.elements.last(),
        Some(ProofElement::Root { leaf_count: 33, .. })
    ));
}
