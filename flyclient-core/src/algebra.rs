//! Hash algebra for the weighted accumulator.
//!
//! `combine` is deliberately non-commutative: the accumulator relies on
//! the argument order to distinguish stored subtree nodes from bagged
//! peaks. `seed_hash` and `seed_to_unit_float` turn a committed root into
//! the deterministic randomness both prover and verifier derive.

use crate::crypto::Hash;
use crate::encoding::{encode_hash_index, encode_hash_pair, rlp_hash};
use crate::weight::Weight;

/// Hash of the ordered pair `[left, right]`.
pub fn combine(left: &Hash, right: &Hash) -> Hash {
    rlp_hash(&encode_hash_pair(left, right))
}

/// Exact sum of two weights.
pub fn combine_weights(left: &Weight, right: &Weight) -> Weight {
    left + right
}

/// Domain-separated seed for the `index`-th sample drawn under `root`.
pub fn seed_hash(root: &Hash, index: u64) -> Hash {
    rlp_hash(&encode_hash_index(root, index))
}

/// Map a hash to a float in `[0, 1)`.
///
/// The first eight bytes are forced into the exponent pattern of a
/// binary64 in `[1, 2)` (`0x3FF` sign/exponent, remaining 52 bits from the
/// hash) and 1.0 is subtracted.
pub fn seed_to_unit_float(h: &Hash) -> f64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&h.as_bytes()[..8]);
    head[0] = 0x3F;
    head[1] |= 0xF0;
    f64::from_bits(u64::from_be_bytes(head)) - 1.0
}
