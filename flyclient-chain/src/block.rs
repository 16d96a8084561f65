//! Block headers.

use std::fmt;

use flyclient_core::encoding::{biguint_bytes, encode_list, rlp_hash};
use flyclient_core::{Hash, Result, RlpItem, RlpReader, Weight};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// A proof-of-work block header.
///
/// `mmr_root` commits to every block before this one, so the head alone
/// anchors a FlyClient proof over the rest of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Miner nonce.
    pub nonce: u64,
    /// Height of the block (genesis is 0).
    pub number: u64,
    /// Hash of the parent block.
    pub parent: Hash,
    /// Work contributed by this block.
    pub difficulty: Weight,
    /// Root of the accumulator over all ancestors.
    pub mmr_root: Hash,
}

impl Block {
    /// Create an unlinked block; `parent` and `mmr_root` are filled in on insert.
    pub fn new(nonce: u64, number: u64, difficulty: Weight) -> Self {
        Self {
            nonce,
            number,
            parent: Hash::ZERO,
            difficulty,
            mmr_root: Hash::ZERO,
        }
    }

    /// The genesis block.
    pub fn genesis() -> Self {
        Self::new(1, 0, Weight::zero())
    }

    /// Canonical RLP encoding of the header.
    pub fn encode(&self) -> Vec<u8> {
        let difficulty = biguint_bytes(&self.difficulty);
        encode_list(&[
            RlpItem::Uint(self.nonce),
            RlpItem::Uint(self.number),
            RlpItem::Bytes(self.parent.as_bytes()),
            RlpItem::Bytes(&difficulty),
            RlpItem::Bytes(self.mmr_root.as_bytes()),
        ])
    }

    /// Decode a header produced by [`Block::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = RlpReader::new(bytes)?;
        let block = Self {
            nonce: reader.uint()?,
            number: reader.uint()?,
            parent: reader.hash()?,
            difficulty: reader.biguint()?,
            mmr_root: reader.hash()?,
        };
        reader.finish()?;
        Ok(block)
    }

    /// SHA3-256 of the canonical encoding.
    pub fn hash(&self) -> Hash {
        rlp_hash(&self.encode())
    }

    /// Whether this is a genesis header.
    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block #{} (difficulty {}, parent {}, mmr_root {})",
            self.number, self.difficulty, self.parent, self.mmr_root
        )
    }
}
