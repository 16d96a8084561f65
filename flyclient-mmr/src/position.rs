//! Position arithmetic for the MMR backing sequence.
//!
//! Nodes are laid out in post-order, one perfect tree ("mountain") after
//! another:
//! ```text
//! Height 2:        6
//!                 / \
//! Height 1:      2   5       9
//!               / \ / \     / \
//! Height 0:    0  1 3  4   7   8   10
//! ```
//! A sequence holding `n` leaves has `2n - popcount(n)` nodes and
//! `popcount(n)` peaks.
//!
//! The same leaves are also read as one binary tree ([`LeafRange`]): a
//! range of `count` leaves splits into a perfect left part and the
//! remainder on the right. Perfect ranges are stored mountains or their
//! descendants; every other range is a bagging node that only exists
//! virtually.

/// Height of the node stored at `pos` (leaves are height 0).
pub fn pos_height(pos: u64) -> u32 {
    let mut p = pos + 1;
    while !all_ones(p) {
        p = jump_left(p);
    }
    63 - p.leading_zeros()
}

/// Move a 1-based position to the equivalent spot in the left mountain.
pub fn jump_left(pos: u64) -> u64 {
    let msb = 1u64 << (63 - pos.leading_zeros());
    pos - (msb - 1)
}

/// True when every significant bit of `n` is set.
pub fn all_ones(n: u64) -> bool {
    n != 0 && n.count_zeros() == n.leading_zeros()
}

/// Distance from the right child at height `height` to its parent's
/// right neighbour; `right + 1 - parent_offset(h)` is the left sibling.
pub fn parent_offset(height: u32) -> u64 {
    2u64 << height
}

/// Distance between two siblings at `height`.
pub fn sibling_offset(height: u32) -> u64 {
    (2u64 << height) - 1
}

/// Backing position of leaf `index`.
pub fn leaf_to_pos(index: u64) -> u64 {
    2 * index - u64::from(index.count_ones())
}

/// Backing size after `leaves` appends.
pub fn size_for_leaves(leaves: u64) -> u64 {
    2 * leaves - u64::from(leaves.count_ones())
}

/// Peak positions for a backing sequence of `size` nodes, leftmost first.
///
/// Sizes that no sequence of appends produces still decompose greedily;
/// use [`leaves_for_size`] to reject them.
pub fn peak_positions(size: u64) -> Vec<u64> {
    let mut peaks = Vec::new();
    let mut offset = 0u64;
    let mut remaining = size;
    while remaining > 0 {
        let tree = mountain_size(remaining);
        peaks.push(offset + tree - 1);
        offset += tree;
        remaining -= tree;
    }
    peaks
}

/// Leaf count for a backing size, or `None` if no append sequence
/// produces that size.
pub fn leaves_for_size(size: u64) -> Option<u64> {
    let mut leaves = 0u64;
    let mut remaining = size;
    let mut last_height = u32::MAX;
    while remaining > 0 {
        let tree = mountain_size(remaining);
        let height = (tree + 1).trailing_zeros() - 1;
        if height >= last_height {
            return None;
        }
        last_height = height;
        leaves += 1u64 << height;
        remaining -= tree;
    }
    Some(leaves)
}

/// Largest `2^k - 1` not exceeding `remaining` (which must be non-zero).
fn mountain_size(remaining: u64) -> u64 {
    let k = 63 - (remaining + 1).leading_zeros();
    (1u64 << k) - 1
}

/// True for 1, 2, 4, 8, ...
pub fn is_power_of_two(n: u64) -> bool {
    n.is_power_of_two()
}

/// Smallest power of two `>= n` (1 for zero).
pub fn next_power_of_two(n: u64) -> u64 {
    n.next_power_of_two()
}

/// Leaves in the left child of a `count`-leaf range (`count >= 2`).
///
/// A perfect range splits in half; any other range keeps its largest
/// power of two on the left.
pub fn left_subtree_leaves(count: u64) -> u64 {
    if count.is_power_of_two() {
        count / 2
    } else {
        1u64 << (63 - count.leading_zeros())
    }
}

/// Backing position of the root of the perfect `count`-leaf subtree that
/// starts at leaf `start` (`count` a power of two, `start` a multiple of it).
pub fn subtree_root_pos(start: u64, count: u64) -> u64 {
    leaf_to_pos(start + count - 1) + u64::from(count.trailing_zeros())
}

/// Depth of the binary tree view over `leaf_count` leaves.
pub fn depth(leaf_count: u64) -> u32 {
    if leaf_count <= 1 {
        0
    } else {
        64 - (leaf_count - 1).leading_zeros()
    }
}

/// A contiguous run of leaves read as one node of the binary tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafRange {
    /// First leaf index.
    pub start: u64,
    /// Number of leaves (at least one).
    pub count: u64,
}

impl LeafRange {
    /// Create a range.
    pub fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// The whole view over `leaf_count` leaves.
    pub fn root(leaf_count: u64) -> Self {
        Self::new(0, leaf_count)
    }

    /// One past the last leaf.
    pub fn end(&self) -> u64 {
        self.start + self.count
    }

    /// A single leaf.
    pub fn is_leaf(&self) -> bool {
        self.count == 1
    }

    /// Perfect ranges exist in the backing sequence. Their children are
    /// combined `combine(left, right)`; bagging ranges use
    /// `combine(right, left)`.
    pub fn is_stored(&self) -> bool {
        self.count.is_power_of_two()
    }

    /// Backing position for a stored range.
    pub fn stored_pos(&self) -> Option<u64> {
        self.is_stored()
            .then(|| subtree_root_pos(self.start, self.count))
    }

    /// Whether `leaf` falls inside the range.
    pub fn contains(&self, leaf: u64) -> bool {
        leaf >= self.start && leaf < self.end()
    }

    /// Split into `(left, right)` children; `None` for a leaf.
    pub fn split(&self) -> Option<(LeafRange, LeafRange)> {
        if self.count < 2 {
            return None;
        }
        let left = left_subtree_leaves(self.count);
        Some((
            LeafRange::new(self.start, left),
            LeafRange::new(self.start + left, self.count - left),
        ))
    }
}
