//! Weighted Merkle Mountain Range for FlyClient.
//!
//! An MMR is an append-only data structure that provides:
//! - O(1) amortized append and O(log n) remove-last
//! - a root committing to every leaf and to their total weight
//! - O(log n) weighted leaf selection and inclusion proofs
//!
//! Every node carries the summed weight of its subtree, so the root
//! doubles as a commitment to the accumulated work of the whole chain.
//!
//! # Example
//!
//! ```rust
//! use flyclient_mmr::Accumulator;
//! use flyclient_core::{hash, Weight};
//!
//! let mut acc = Accumulator::in_memory();
//! for i in 0..5u32 {
//!     acc.append(hash(&i.to_be_bytes()), Weight::from(1000u32)).unwrap();
//! }
//!
//! let root = acc.root().unwrap().unwrap();
//! assert_eq!(root.weight, Weight::from(5000u32));
//!
//! let proof = acc.inclusion_proof(3).unwrap();
//! assert!(proof.verify(&root.hash, &root.weight));
//! ```

mod mmr;
mod node;
pub mod position;
mod store;

#[cfg(test)]
mod proptest;

pub use mmr::{Accumulator, InclusionProof, PathStep};
pub use node::Node;
pub use position::LeafRange;
pub use store::{MemStore, NodeStore};
