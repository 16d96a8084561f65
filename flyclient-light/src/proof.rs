//! FlyClient proof format.
//!
//! A proof is the pre-order serialization of the part of the tree view
//! that leads to the disclosed leaves. Everything else is collapsed into
//! opaque siblings carrying only a hash and a weight. The disclosed leaf
//! indices travel with the proof and fix the shape of the descent.

use flyclient_core::{Hash, Result, Weight};
use serde::{Deserialize, Serialize};

/// One element of a proof, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofElement {
    /// Trailing element restating the committed root.
    Root {
        /// Root hash.
        hash: Hash,
        /// Total committed weight.
        weight: Weight,
        /// Number of leaves under the root.
        leaf_count: u64,
    },
    /// A subtree without disclosed leaves.
    Sibling {
        /// Subtree hash.
        hash: Hash,
        /// Subtree weight.
        weight: Weight,
        /// Whether the subtree is the right child of its parent.
        is_right: bool,
    },
    /// A disclosed leaf.
    Leaf {
        /// Leaf hash.
        hash: Hash,
        /// Leaf weight.
        weight: Weight,
    },
}

impl ProofElement {
    /// Hash carried by the element.
    pub fn hash(&self) -> &Hash {
        match self {
            ProofElement::Root { hash, .. }
            | ProofElement::Sibling { hash, .. }
            | ProofElement::Leaf { hash, .. } => hash,
        }
    }

    /// Weight carried by the element.
    pub fn weight(&self) -> &Weight {
        match self {
            ProofElement::Root { weight, .. }
            | ProofElement::Sibling { weight, .. }
            | ProofElement::Leaf { weight, .. } => weight,
        }
    }
}

/// Succinct proof that a chain of `leaf_count` items carries
/// `root_weight` of work under `root_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Committed root hash.
    pub root_hash: Hash,
    /// Committed total weight.
    pub root_weight: Weight,
    /// Number of leaves under the root.
    pub leaf_count: u64,
    /// Traversal-ordered elements ending with [`ProofElement::Root`].
    pub elements: Vec<ProofElement>,
    /// Leaves the elements disclose, strictly ascending.
    pub disclosed_leaves: Vec<u64>,
    /// One leaf per weight target, ascending, duplicates kept.
    pub queried_leaves: Vec<u64>,
}

impl Proof {
    /// Number of disclosed leaves.
    pub fn leaf_elements(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, ProofElement::Leaf { .. }))
            .count()
    }

    /// Serialize to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes (bincode).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A queried leaf paired with the target it must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct QueriedLeaf {
    /// Leaf index claimed by the proof.
    pub index: u64,
    /// Weight target in `[0, 1)`.
    pub target: f64,
    /// Integer position on the cumulative weight axis.
    pub threshold: Weight,
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyclient_core::hash;

    fn sample_proof() -> Proof {
        Proof {
            root_hash: hash(b"root"),
            root_weight: Weight::from(3000u32),
            leaf_count: 3,
            elements: vec![
                ProofElement::Sibling {
                    hash: hash(b"left"),
                    weight: Weight::from(2000u32),
                    is_right: false,
                },
                ProofElement::Leaf {
                    hash: hash(b"leaf"),
                    weight: Weight::from(1000u32),
                },
                ProofElement::Root {
                    hash: hash(b"root"),
                    weight: Weight::from(3000u32),
                    leaf_count: 3,
                },
            ],
            disclosed_leaves: vec![2],
            queried_leaves: vec![2, 2],
        }
    }

    #[test]
    fn test_accessors() {
        let proof = sample_proof();
        assert_eq!(proof.leaf_elements(), proof.disclosed_leaves.len());
        assert_eq!(*proof.elements[0].weight(), Weight::from(2000u32));
        assert_eq!(*proof.elements[1].hash(), hash(b"leaf"));
    }

    #[test]
    fn test_bincode_roundtrip() {
        let proof = sample_proof();
        let bytes = proof.to_bytes().unwrap();
        assert_eq!(Proof::from_bytes(&bytes).unwrap(), proof);
    }

    #[test]
    fn test_json_roundtrip() {
        let proof = sample_proof();
        let json = proof.to_json().unwrap();
        assert_eq!(Proof::from_json(&json).unwrap(), proof);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Proof::from_bytes(&[0xff; 4]).is_err());
    }
}
