//! FlyClient light-client proofs.
//!
//! A prover holding the full chain commits to it with a weighted MMR and
//! answers with a proof that discloses only `O(lambda * log n)` leaves.
//! The verifier, holding nothing but the proof and the public security
//! parameters, accepts if an adversary with less than a fraction `c` of
//! the work could have produced it with probability below `2^-lambda`.
//!
//! # Architecture
//!
//! ```text
//! Accumulator ──snapshot──► Sampler ──Sample──► ProofBuilder ──Proof──► ProofVerifier
//! ```
//!
//! # Example
//!
//! ```rust
//! use flyclient_core::{hash, Weight};
//! use flyclient_light::{ProofBuilder, ProofVerifier};
//! use flyclient_mmr::Accumulator;
//!
//! let mut acc = Accumulator::in_memory();
//! for i in 0..11u32 {
//!     acc.append(hash(&i.to_be_bytes()), Weight::from(1000u32)).unwrap();
//! }
//!
//! let tail = Weight::from(1000u32);
//! let proof = ProofBuilder::default().prove(&acc, &tail).unwrap();
//! assert_eq!(proof.queried_leaves.len(), 112);
//! assert!(ProofVerifier::default().verify(&proof, &tail).unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod builder;
pub mod config;
pub mod errors;
pub mod proof;
pub mod sampling;
pub mod verifier;

#[cfg(test)]
mod proptest;

pub use builder::ProofBuilder;
pub use config::{FlyClientConfig, FlyClientConfigBuilder};
pub use errors::VerifyError;
pub use proof::{Proof, ProofElement, QueriedLeaf};
pub use sampling::{Sample, Sampler};
pub use verifier::ProofVerifier;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::ProofBuilder;
    pub use crate::config::FlyClientConfig;
    pub use crate::errors::VerifyError;
    pub use crate::proof::Proof;
    pub use crate::verifier::ProofVerifier;
}
