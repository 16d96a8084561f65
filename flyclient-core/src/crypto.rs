//! Hashing primitives for FlyClient.
//!
//! All digests are SHA3-256. Structured preimages (pairs of hashes,
//! hash/index pairs, block headers) are RLP encoded first so that the
//! hash of a value never depends on in-memory layout.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::error::{Error, Result};

/// Length of a digest in bytes.
pub const HASH_LENGTH: usize = 32;

/// A 32-byte hash value.
///
/// Ordering compares the bytes as a big-endian unsigned integer, which is
/// what difficulty-target checks expect.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash([u8; HASH_LENGTH]);

impl Hash {
    /// The zero hash (used as the empty-accumulator sentinel).
    pub const ZERO: Self = Self([0u8; HASH_LENGTH]);

    /// Create a hash from raw bytes.
    pub fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a hash from a slice, left-padding short input with zeros.
    ///
    /// Input longer than 32 bytes keeps its trailing 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut arr = [0u8; HASH_LENGTH];
        if bytes.len() >= HASH_LENGTH {
            arr.copy_from_slice(&bytes[bytes.len() - HASH_LENGTH..]);
        } else {
            arr[HASH_LENGTH - bytes.len()..].copy_from_slice(bytes);
        }
        Self(arr)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Create from hex string (an optional `0x` prefix is accepted).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH_LENGTH {
            return Err(Error::invalid_hash(format!(
                "expected {} bytes, got {}",
                HASH_LENGTH,
                bytes.len()
            )));
        }
        let mut arr = [0u8; HASH_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Compare as big-endian unsigned integers.
    pub fn cmp_value(&self, other: &Hash) -> Ordering {
        self.0.cmp(&other.0)
    }

    /// Shift the whole 256-bit value left by `n` bits.
    pub fn lsh(&mut self, n: usize) {
        if n >= HASH_LENGTH * 8 {
            self.0 = [0u8; HASH_LENGTH];
            return;
        }
        let shift = n / 8;
        let bits = n % 8;
        let mut out = [0u8; HASH_LENGTH];
        for (i, slot) in out.iter_mut().enumerate().take(HASH_LENGTH - shift) {
            let hi = self.0[i + shift];
            let lo = self.0.get(i + shift + 1).copied().unwrap_or(0);
            *slot = if bits == 0 {
                hi
            } else {
                (hi << bits) | (lo >> (8 - bits))
            };
        }
        self.0 = out;
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LENGTH]> for Hash {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

/// Hash arbitrary data with SHA3-256.
pub fn hash(data: &[u8]) -> Hash {
    let digest = Sha3_256::digest(data);
    Hash(digest.into())
}
