//! Core weighted accumulator.
//!
//! An append-only Merkle Mountain Range whose nodes carry both a hash and
//! the accumulated weight of their subtree. The root commits to every
//! leaf and to the total weight.
//!
//! Peaks are bagged from the most recent one backwards:
//! ```text
//! peaks [P1, P2, P3]  ->  root = combine(combine(P3, P2), P1)
//! ```

use flyclient_core::{Error, Hash, Result, Weight};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::node::Node;
use crate::position::{
    leaf_to_pos, leaves_for_size, parent_offset, peak_positions, pos_height, size_for_leaves,
    LeafRange,
};
use crate::store::{MemStore, NodeStore};

/// Weighted Merkle Mountain Range.
#[derive(Debug, Clone)]
pub struct Accumulator<S: NodeStore = MemStore> {
    store: S,
    leaf_count: u64,
}

impl Accumulator<MemStore> {
    /// Create an empty in-memory accumulator.
    pub fn in_memory() -> Self {
        Self {
            store: MemStore::new(),
            leaf_count: 0,
        }
    }
}

impl<S: NodeStore> Accumulator<S> {
    /// Create a new accumulator over an empty store.
    ///
    /// A populated store must be resumed with [`Accumulator::from_store`].
    pub fn new(store: S) -> Result<Self> {
        if store.size() != 0 {
            return Err(Error::invalid_parameter(format!(
                "store already holds {} nodes",
                store.size()
            )));
        }
        Ok(Self {
            store,
            leaf_count: 0,
        })
    }

    /// Resume an accumulator from a populated store.
    pub fn from_store(store: S) -> Result<Self> {
        let size = store.size();
        let leaf_count = leaves_for_size(size).ok_or_else(|| {
            Error::invariant(format!("store size {} is not a valid accumulator size", size))
        })?;
        Ok(Self { store, leaf_count })
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Number of stored nodes.
    pub fn size(&self) -> u64 {
        self.store.size()
    }

    /// True before the first append.
    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Independent copy for proving while the original keeps growing.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Append a leaf and return it with its position.
    ///
    /// Completes as many equal-height mountains as the new leaf count has
    /// trailing zero bits.
    pub fn append(&mut self, hash: Hash, weight: Weight) -> Result<Node> {
        let leaf = Node::new(hash, weight, self.store.size());
        self.store.push(leaf.clone())?;
        self.leaf_count += 1;

        let merges = self.leaf_count.trailing_zeros();
        let mut right = leaf.clone();
        for height in 0..merges {
            let left_pos = right.position + 1 - parent_offset(height);
            let left = self.node(left_pos)?;
            let parent = Node::merge(&left, &right, self.store.size());
            if parent.position != right.position + 1 {
                return Err(Error::invariant(format!(
                    "merged node at {} does not follow right child {}",
                    parent.position, right.position
                )));
            }
            trace!(height = height + 1, position = parent.position, "merged mountains");
            self.store.push(parent.clone())?;
            right = parent;
        }

        debug!(
            leaf_count = self.leaf_count,
            position = leaf.position,
            size = self.store.size(),
            "appended leaf"
        );
        Ok(leaf)
    }

    /// Append several leaves, returning their positions.
    pub fn append_batch(&mut self, leaves: &[(Hash, Weight)]) -> Result<Vec<u64>> {
        let mut positions = Vec::with_capacity(leaves.len());
        for (hash, weight) in leaves {
            positions.push(self.append(*hash, weight.clone())?.position);
        }
        Ok(positions)
    }

    /// Undo the most recent append and return the removed leaf.
    pub fn remove_last(&mut self) -> Result<Node> {
        if self.leaf_count == 0 {
            return Err(Error::invariant("remove_last on an empty accumulator"));
        }

        let size = self.store.size();
        let last_peak = peak_positions(size)
            .pop()
            .ok_or_else(|| Error::invariant("non-empty accumulator without peaks"))?;

        // The right child of the node at `pos` sits at `pos - 1`.
        let leaf_pos = last_peak - u64::from(pos_height(last_peak));
        let expected = leaf_to_pos(self.leaf_count - 1);
        if leaf_pos != expected {
            return Err(Error::invariant(format!(
                "rightmost spine ends at {} but last leaf is at {}",
                leaf_pos, expected
            )));
        }
        let leaf = self.node(leaf_pos)?;

        let new_size = size_for_leaves(self.leaf_count - 1);
        self.store.truncate(new_size)?;
        self.leaf_count -= 1;

        debug!(leaf_count = self.leaf_count, size = new_size, "removed last leaf");
        Ok(leaf)
    }

    /// Peak nodes, leftmost (oldest, tallest) first.
    pub fn peaks(&self) -> Result<Vec<Node>> {
        self.peak_positions()
            .into_iter()
            .map(|pos| self.node(pos))
            .collect()
    }

    /// Peak positions, leftmost first.
    pub fn peak_positions(&self) -> Vec<u64> {
        peak_positions(self.store.size())
    }

    /// Bagged root, `None` when empty.
    pub fn root(&self) -> Result<Option<Node>> {
        if self.leaf_count == 0 {
            return Ok(None);
        }
        self.subtree(0, self.leaf_count).map(Some)
    }

    /// Root hash (`Hash::ZERO` when empty).
    pub fn root_hash(&self) -> Result<Hash> {
        Ok(self.root()?.map(|n| n.hash).unwrap_or(Hash::ZERO))
    }

    /// Total weight, `None` when empty.
    pub fn root_weight(&self) -> Result<Option<Weight>> {
        Ok(self.root()?.map(|n| n.weight))
    }

    /// Leaf `index`.
    pub fn leaf(&self, index: u64) -> Result<Node> {
        if index >= self.leaf_count {
            return Err(Error::out_of_range(format!(
                "leaf {} >= leaf count {}",
                index, self.leaf_count
            )));
        }
        self.node(leaf_to_pos(index))
    }

    /// Node of the binary tree view covering `count` leaves from `start`.
    ///
    /// Perfect ranges are read from the store. Other ranges are bagged on
    /// the fly and carry the backing size as their position.
    pub fn subtree(&self, start: u64, count: u64) -> Result<Node> {
        if count == 0 || start.checked_add(count).map_or(true, |end| end > self.leaf_count) {
            return Err(Error::out_of_range(format!(
                "range {}+{} outside {} leaves",
                start, count, self.leaf_count
            )));
        }

        // Perfect chunks of the range, largest first.
        let mut chunks = Vec::new();
        let mut offset = start;
        let mut remaining = count;
        while remaining > 0 {
            let chunk = 1u64 << (63 - remaining.leading_zeros());
            if offset % chunk != 0 {
                return Err(Error::invalid_parameter(format!(
                    "range {}+{} is not a node of the tree view",
                    start, count
                )));
            }
            chunks.push(LeafRange::new(offset, chunk));
            offset += chunk;
            remaining -= chunk;
        }

        let virtual_pos = self.store.size();
        let mut ranges = chunks.iter().rev();
        let mut acc = match ranges.next().and_then(LeafRange::stored_pos) {
            Some(pos) => self.node(pos)?,
            None => return Err(Error::invariant("empty chunk decomposition")),
        };
        for range in ranges {
            let pos = range
                .stored_pos()
                .ok_or_else(|| Error::invariant("chunk is not a perfect range"))?;
            acc = Node::bag(&acc, &self.node(pos)?, virtual_pos);
        }
        Ok(acc)
    }

    /// Leaf whose cumulative weight interval contains `threshold`.
    ///
    /// Descends from the root keeping `acc`, the weight of everything left
    /// of the current range: go right when `threshold >= acc + left`,
    /// otherwise go left. For `threshold` below the total this never
    /// lands on a zero-weight leaf.
    pub fn select_leaf_by_weight(&self, threshold: &Weight) -> Result<u64> {
        if self.leaf_count == 0 {
            return Err(Error::invalid_parameter("weighted selection on an empty accumulator"));
        }

        let mut range = LeafRange::root(self.leaf_count);
        let mut acc = Weight::zero();
        while let Some((left, right)) = range.split() {
            let left_weight = self.subtree(left.start, left.count)?.weight;
            let boundary = &acc + &left_weight;
            if *threshold >= boundary {
                acc = boundary;
                range = right;
            } else {
                range = left;
            }
        }
        trace!(leaf = range.start, "selected leaf by weight");
        Ok(range.start)
    }

    /// Proof that leaf `index` is committed to by the current root.
    pub fn inclusion_proof(&self, index: u64) -> Result<InclusionProof> {
        let leaf = self.leaf(index)?;

        let mut range = LeafRange::root(self.leaf_count);
        let mut path = Vec::new();
        while let Some((left, right)) = range.split() {
            let (next, sibling) = if left.contains(index) {
                (left, right)
            } else {
                (right, left)
            };
            path.push(self.subtree(sibling.start, sibling.count)?);
            range = next;
        }
        path.reverse();

        Ok(InclusionProof {
            leaf_count: self.leaf_count,
            leaf_index: index,
            leaf,
            path: path
                .into_iter()
                .map(|n| PathStep {
                    hash: n.hash,
                    weight: n.weight,
                })
                .collect(),
        })
    }

    /// Inclusion proofs for several leaves, built in parallel.
    pub fn inclusion_proof_batch(&self, indices: &[u64]) -> Result<Vec<InclusionProof>>
    where
        S: Sync,
    {
        use rayon::prelude::*;

        // For small batches, sequential is faster (no thread overhead)
        if indices.len() < 16 {
            return indices.iter().map(|&i| self.inclusion_proof(i)).collect();
        }
        indices
            .par_iter()
            .map(|&i| self.inclusion_proof(i))
            .collect()
    }

    fn node(&self, pos: u64) -> Result<Node> {
        self.store
            .get(pos)?
            .ok_or_else(|| Error::invariant(format!("missing node at position {}", pos)))
    }
}

/// Sibling met on the way from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub hash: Hash,
    pub weight: Weight,
}

/// Single-leaf inclusion proof against a weighted root.
///
/// The side and combination order of every step follow from
/// `leaf_count` and `leaf_index`, so only sibling values are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub leaf_count: u64,
    pub leaf_index: u64,
    pub leaf: Node,
    /// Siblings from the leaf's level up to the root's children.
    pub path: Vec<PathStep>,
}

impl InclusionProof {
    /// Check the proof against a committed root hash and total weight.
    pub fn verify(&self, root_hash: &Hash, root_weight: &Weight) -> bool {
        if self.leaf_index >= self.leaf_count
            || self.leaf.position != leaf_to_pos(self.leaf_index)
        {
            return false;
        }

        // (range was stored, target went right) from the root down
        let mut shape = Vec::new();
        let mut range = LeafRange::root(self.leaf_count);
        while let Some((left, right)) = range.split() {
            let went_right = right.contains(self.leaf_index);
            shape.push((range.is_stored(), went_right));
            range = if went_right { right } else { left };
        }
        if shape.len() != self.path.len() {
            debug!(
                expected = shape.len(),
                provided = self.path.len(),
                "inclusion path has wrong length"
            );
            return false;
        }

        let mut acc = self.leaf.clone();
        for (step, (stored, went_right)) in self.path.iter().zip(shape.iter().rev()) {
            let sibling = Node::new(step.hash, step.weight.clone(), acc.position);
            let (left, right) = if *went_right {
                (&sibling, &acc)
            } else {
                (&acc, &sibling)
            };
            acc = if *stored {
                Node::merge(left, right, acc.position)
            } else {
                Node::bag(right, left, acc.position)
            };
        }

        acc.hash == *root_hash && acc.weight == *root_weight
    }
}
