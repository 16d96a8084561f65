//! Canonical RLP encoding of the value shapes that get hashed.
//!
//! Only the shapes the protocol needs are supported: byte strings,
//! unsigned integers (fixed-width and arbitrary-precision) and flat
//! lists of those. The encoding is injective over these shapes and
//! stable across runs, which is all a hash preimage requires.

use alloy_rlp::{Decodable, Encodable, Header};
use num_bigint::BigUint;

use crate::crypto::{hash, Hash};
use crate::error::{Error, Result};

/// A single field of an RLP list.
#[derive(Debug, Clone, Copy)]
pub enum RlpItem<'a> {
    /// A byte string.
    Bytes(&'a [u8]),
    /// An unsigned integer (minimal big-endian, zero is the empty string).
    Uint(u64),
}

impl RlpItem<'_> {
    fn length(&self) -> usize {
        match self {
            RlpItem::Bytes(b) => <[u8] as Encodable>::length(b),
            RlpItem::Uint(v) => v.length(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            RlpItem::Bytes(b) => <[u8] as Encodable>::encode(b, out),
            RlpItem::Uint(v) => v.encode(out),
        }
    }
}

/// Encode a flat list of items.
pub fn encode_list(items: &[RlpItem<'_>]) -> Vec<u8> {
    let payload_length: usize = items.iter().map(RlpItem::length).sum();
    let header = Header {
        list: true,
        payload_length,
    };
    let mut out = Vec::with_capacity(header.length() + payload_length);
    header.encode(&mut out);
    for item in items {
        item.encode(&mut out);
    }
    out
}

/// Encode the ordered pair `[left, right]`.
pub fn encode_hash_pair(left: &Hash, right: &Hash) -> Vec<u8> {
    encode_list(&[
        RlpItem::Bytes(left.as_bytes()),
        RlpItem::Bytes(right.as_bytes()),
    ])
}

/// Encode the ordered pair `[hash, index]`.
pub fn encode_hash_index(h: &Hash, index: u64) -> Vec<u8> {
    encode_list(&[RlpItem::Bytes(h.as_bytes()), RlpItem::Uint(index)])
}

/// Minimal big-endian bytes of a big integer (zero encodes as empty).
pub fn biguint_bytes(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// SHA3-256 over an already encoded preimage.
pub fn rlp_hash(encoded: &[u8]) -> Hash {
    hash(encoded)
}

/// Sequential reader over the fields of one RLP list.
#[derive(Debug)]
pub struct RlpReader<'a> {
    payload: &'a [u8],
}

impl<'a> RlpReader<'a> {
    /// Open a list; the whole input must be exactly one list.
    pub fn new(mut buf: &'a [u8]) -> Result<Self> {
        let header = Header::decode(&mut buf).map_err(rlp_error)?;
        if !header.list {
            return Err(Error::serialization("expected rlp list"));
        }
        if buf.len() != header.payload_length {
            return Err(Error::serialization(format!(
                "rlp list length {} does not match remaining {} bytes",
                header.payload_length,
                buf.len()
            )));
        }
        Ok(Self { payload: buf })
    }

    /// Read a byte string field.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let header = Header::decode(&mut self.payload).map_err(rlp_error)?;
        if header.list {
            return Err(Error::serialization("expected rlp string, found list"));
        }
        if self.payload.len() < header.payload_length {
            return Err(Error::serialization("rlp string overruns input"));
        }
        let (value, rest) = self.payload.split_at(header.payload_length);
        self.payload = rest;
        Ok(value)
    }

    /// Read a fixed-size hash field.
    pub fn hash(&mut self) -> Result<Hash> {
        let bytes = self.bytes()?;
        if bytes.len() != 32 {
            return Err(Error::serialization(format!(
                "expected 32-byte hash, got {} bytes",
                bytes.len()
            )));
        }
        Ok(Hash::from_slice(bytes))
    }

    /// Read a `u64` field.
    pub fn uint(&mut self) -> Result<u64> {
        u64::decode(&mut self.payload).map_err(rlp_error)
    }

    /// Read an arbitrary-precision unsigned integer field.
    pub fn biguint(&mut self) -> Result<BigUint> {
        let bytes = self.bytes()?;
        if bytes.first() == Some(&0) {
            return Err(Error::serialization("non-canonical integer: leading zero"));
        }
        Ok(BigUint::from_bytes_be(bytes))
    }

    /// Fail unless every field was consumed.
    pub fn finish(self) -> Result<()> {
        if self.payload.is_empty() {
            Ok(())
        } else {
            Err(Error::serialization(format!(
                "{} trailing bytes in rlp list",
                self.payload.len()
            )))
        }
    }
}

fn rlp_error(e: alloy_rlp::Error) -> Error {
    Error::serialization(format!("rlp: {}", e))
}
