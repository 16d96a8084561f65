//! Storage traits and implementations for the accumulator.

use flyclient_core::{Error, Result};

use crate::node::Node;

/// Trait for backing-sequence storage.
///
/// Nodes are addressed by position and only ever pushed at the end or
/// truncated from the end, so any store is a growable array.
pub trait NodeStore: Clone {
    /// Get a node by position.
    fn get(&self, pos: u64) -> Result<Option<Node>>;

    /// Append a node, returning its position.
    fn push(&mut self, node: Node) -> Result<u64>;

    /// Drop every node at or beyond `size`.
    fn truncate(&mut self, size: u64) -> Result<()>;

    /// Current number of nodes.
    fn size(&self) -> u64;
}

/// In-memory store backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    nodes: Vec<Node>,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// All nodes in position order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl NodeStore for MemStore {
    fn get(&self, pos: u64) -> Result<Option<Node>> {
        Ok(usize::try_from(pos)
            .ok()
            .and_then(|i| self.nodes.get(i))
            .cloned())
    }

    fn push(&mut self, node: Node) -> Result<u64> {
        let pos = self.nodes.len() as u64;
        if node.position != pos {
            return Err(Error::invariant(format!(
                "node for position {} pushed at {}",
                node.position, pos
            )));
        }
        self.nodes.push(node);
        Ok(pos)
    }

    fn truncate(&mut self, size: u64) -> Result<()> {
        let size = usize::try_from(size)
            .map_err(|_| Error::out_of_range(format!("size {} exceeds address space", size)))?;
        self.nodes.truncate(size);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.nodes.len() as u64
    }
}
