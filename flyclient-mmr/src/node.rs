//! Weighted accumulator nodes.

use flyclient_core::{combine, combine_weights, Hash, Weight};
use serde::{Deserialize, Serialize};

/// A node of the weighted accumulator.
///
/// Leaves carry their own weight, inner nodes the sum over their subtree.
/// `position` is the index in the backing sequence; a bagged node that is
/// never stored carries the backing size instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub hash: Hash,
    pub weight: Weight,
    pub position: u64,
}

impl Node {
    /// Create a node.
    pub fn new(hash: Hash, weight: Weight, position: u64) -> Self {
        Self {
            hash,
            weight,
            position,
        }
    }

    /// Parent of two stored siblings: `combine(left, right)`.
    pub fn merge(left: &Node, right: &Node, position: u64) -> Self {
        Self {
            hash: combine(&left.hash, &right.hash),
            weight: combine_weights(&left.weight, &right.weight),
            position,
        }
    }

    /// Bag a more recent range onto an older one: `combine(recent, older)`.
    pub fn bag(recent: &Node, older: &Node, position: u64) -> Self {
        Self {
            hash: combine(&recent.hash, &older.hash),
            weight: combine_weights(&recent.weight, &older.weight),
            position,
        }
    }
}
