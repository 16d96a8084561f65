//! Block storage.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use flyclient_core::{Error, Hash, Result};
use parking_lot::RwLock;

use crate::block::Block;

/// Key-value store for encoded block headers.
///
/// Entries are content addressed: writing different bytes under an
/// existing key fails with a storage error.
pub trait BlockStore: Send + Sync {
    /// Store encoded bytes under `hash`.
    fn put(&self, hash: Hash, bytes: Vec<u8>) -> Result<()>;

    /// Fetch the bytes stored under `hash`.
    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Check if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode and store a block under its hash.
    fn put_block(&self, block: &Block) -> Result<Hash> {
        let hash = block.hash();
        self.put(hash, block.encode())?;
        Ok(hash)
    }

    /// Fetch and decode a block.
    fn get_block(&self, hash: &Hash) -> Result<Option<Block>> {
        self.get(hash)?.map(|bytes| Block::decode(&bytes)).transpose()
    }
}

/// In-memory block store.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<Hash, Vec<u8>>>,
}

impl MemoryBlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for MemoryBlockStore {
    fn put(&self, hash: Hash, bytes: Vec<u8>) -> Result<()> {
        match self.blocks.write().entry(hash) {
            Entry::Occupied(existing) if *existing.get() != bytes => Err(Error::storage_write(
                format!("conflicting entry for {}", hash),
            )),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(bytes);
                Ok(())
            }
        }
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>> {
        Ok(self.blocks.read().get(hash).cloned())
    }

    fn len(&self) -> usize {
        self.blocks.read().len()
    }
}
