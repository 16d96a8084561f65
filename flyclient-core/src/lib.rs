//! FlyClient Core - Fundamental types for FlyClient light-client proofs.
//!
//! This crate provides the primitives shared by the accumulator, the
//! prover and the verifier:
//!
//! - [`crypto`] - 32-byte hashes (SHA3-256)
//! - [`encoding`] - canonical RLP preimages
//! - [`algebra`] - ordered hash combination and sampling seeds
//! - [`weight`] - arbitrary-precision accumulated work
//! - [`error`] - coded error type
//!
//! # Example
//!
//! ```rust
//! use flyclient_core::{combine, hash, seed_hash, seed_to_unit_float, Weight};
//!
//! let left = hash(b"block 0");
//! let right = hash(b"block 1");
//! let parent = combine(&left, &right);
//! let weight = Weight::from(1000u32) + Weight::from(1000u32);
//!
//! let y = seed_to_unit_float(&seed_hash(&parent, 0));
//! assert!((0.0..1.0).contains(&y));
//! assert_eq!(weight, Weight::from(2000u32));
//! ```

pub mod algebra;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod weight;

#[cfg(test)]
mod proptest;

// Re-exports for convenience
pub use algebra::{combine, combine_weights, seed_hash, seed_to_unit_float};
pub use crypto::{hash, Hash, HASH_LENGTH};
pub use encoding::{RlpItem, RlpReader};
pub use error::{Error, ErrorCode, Result};
pub use weight::{weight_from_f64, weight_to_f64, Weight};
