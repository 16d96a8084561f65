//! Proof verification.
//!
//! The verifier never sees the accumulator. It recomputes the sample
//! count and weight targets from the proof header and the tail weight,
//! then decodes the element stream against the tree view implied by
//! `leaf_count` and the disclosed leaves, rebuilding the root bottom-up.

use std::collections::BTreeMap;

use flyclient_core::{Hash, Result, Weight};
use flyclient_mmr::{LeafRange, Node};
use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use crate::config::FlyClientConfig;
use crate::errors::VerifyError;
use crate::proof::{Proof, ProofElement, QueriedLeaf};
use crate::sampling::{checkpoint_indices, required_queries, target_threshold, weight_targets};

/// Pending work while decoding the element stream, in the order the
/// builder emitted it.
enum Task {
    /// Decode a range; `disclosed[lo..hi]` fall inside it.
    Descend { range: LeafRange, lo: usize, hi: usize },
    /// Consume an opaque sibling on the given side.
    Sibling { is_right: bool },
    /// Both children are on the value stack; combine them.
    Merge(LeafRange),
}

/// Checks FlyClient proofs.
#[derive(Debug, Clone, Default)]
pub struct ProofVerifier {
    config: FlyClientConfig,
}

impl ProofVerifier {
    /// Create a verifier with validated parameters.
    pub fn new(config: FlyClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The parameters in use.
    pub fn config(&self) -> &FlyClientConfig {
        &self.config
    }

    /// Recompute the sample count and pair each queried leaf with its
    /// weight target.
    pub fn check_query_count(
        &self,
        proof: &Proof,
        tail: &Weight,
    ) -> std::result::Result<Vec<QueriedLeaf>, VerifyError> {
        let required = required_queries(&self.config, tail, &proof.root_weight, proof.leaf_count)?;
        let provided = proof.queried_leaves.len() as u64;
        if required != provided {
            return Err(VerifyError::QueryCountMismatch { required, provided });
        }

        let targets = weight_targets(&proof.root_hash, tail, &proof.root_weight, required);
        let mut indices = proof.queried_leaves.clone();
        indices.sort_unstable();

        Ok(indices
            .into_iter()
            .zip(targets)
            .map(|(index, target)| QueriedLeaf {
                index,
                target,
                threshold: target_threshold(target, &proof.root_weight),
            })
            .collect())
    }

    /// Verify a proof against the tail weight.
    ///
    /// Returns `Ok(false)` for any proof that does not check out and an
    /// error only when the sample count cannot be established.
    pub fn verify(&self, proof: &Proof, tail: &Weight) -> std::result::Result<bool, VerifyError> {
        let queried = self.check_query_count(proof, tail)?;
        let checkpoints = checkpoint_indices(&self.config, proof.leaf_count);
        Ok(replay(proof, &queried, &checkpoints))
    }

    /// Verify several proofs in parallel.
    ///
    /// # Returns
    /// - `Ok(true)` if all proofs are valid
    /// - `Ok(false)` if any proof is invalid
    /// - `Err` if any proof cannot be checked at all
    pub fn verify_batch(
        &self,
        proofs: &[Proof],
        tail: &Weight,
    ) -> std::result::Result<bool, VerifyError> {
        // For small batches, sequential is faster
        if proofs.len() < 4 {
            for proof in proofs {
                if !self.verify(proof, tail)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        let results: std::result::Result<Vec<bool>, VerifyError> =
            proofs.par_iter().map(|p| self.verify(p, tail)).collect();
        results.map(|v| v.into_iter().all(|ok| ok))
    }
}

fn reject(reason: &str) -> bool {
    debug!(reason, "proof rejected");
    false
}

/// Decode `proof.elements` and check it against the queried targets.
///
/// The disclosed leaves determine which subtrees are expanded and which
/// are opaque, so every element is read at exactly one position of the
/// tree view.
fn replay(proof: &Proof, queried: &[QueriedLeaf], checkpoints: &[u64]) -> bool {
    let Some((last, body)) = proof.elements.split_last() else {
        return reject("no elements");
    };
    match last {
        ProofElement::Root {
            hash,
            weight,
            leaf_count,
        } if *hash == proof.root_hash
            && *weight == proof.root_weight
            && *leaf_count == proof.leaf_count => {}
        _ => return reject("trailing root does not match the header"),
    }
    if proof.leaf_count == 0 {
        return reject("empty chain");
    }

    let disclosed = proof.disclosed_leaves.as_slice();
    if disclosed.windows(2).any(|w| w[0] >= w[1]) {
        return reject("disclosed leaves not strictly ascending");
    }
    if disclosed.last().map_or(false, |&i| i >= proof.leaf_count) {
        return reject("disclosed leaf out of range");
    }
    if queried
        .iter()
        .any(|q| disclosed.binary_search(&q.index).is_err())
    {
        return reject("queried leaf not disclosed");
    }
    if checkpoints
        .iter()
        .any(|c| disclosed.binary_search(c).is_err())
    {
        return reject("checkpoint not disclosed");
    }

    // Nothing disclosed: a bare root sibling.
    if disclosed.is_empty() {
        return match body {
            [ProofElement::Sibling {
                hash,
                weight,
                is_right: false,
            }] => root_matches(proof, hash, weight),
            _ => reject("expected a bare root sibling"),
        };
    }

    let mut thresholds: BTreeMap<u64, Vec<&Weight>> = BTreeMap::new();
    for q in queried {
        thresholds.entry(q.index).or_default().push(&q.threshold);
    }

    let mut elements = body.iter();
    let mut values: Vec<Node> = Vec::new();
    let mut left_acc = Weight::zero();
    let mut stack = vec![Task::Descend {
        range: LeafRange::root(proof.leaf_count),
        lo: 0,
        hi: disclosed.len(),
    }];

    while let Some(task) = stack.pop() {
        match task {
            Task::Sibling { is_right } => {
                let Some(ProofElement::Sibling {
                    hash,
                    weight,
                    is_right: side,
                }) = elements.next()
                else {
                    return reject("expected a sibling");
                };
                if *side != is_right {
                    return reject("sibling on the wrong side");
                }
                left_acc += weight;
                values.push(Node::new(*hash, weight.clone(), 0));
            }
            Task::Descend { range, lo, hi } => {
                let Some((left, right)) = range.split() else {
                    let Some(ProofElement::Leaf { hash, weight }) = elements.next() else {
                        return reject("expected a leaf");
                    };
                    if let Some(targets) = thresholds.get(&range.start) {
                        let upper = &left_acc + weight;
                        if targets.iter().any(|t| **t < left_acc || **t >= upper) {
                            return reject("weighted position out of bound");
                        }
                    }
                    left_acc += weight;
                    values.push(Node::new(*hash, weight.clone(), 0));
                    continue;
                };

                let mid = lo + disclosed[lo..hi].partition_point(|&i| i < right.start);
                stack.push(Task::Merge(range));
                stack.push(if mid < hi {
                    Task::Descend {
                        range: right,
                        lo: mid,
                        hi,
                    }
                } else {
                    Task::Sibling { is_right: true }
                });
                stack.push(if lo < mid {
                    Task::Descend {
                        range: left,
                        lo,
                        hi: mid,
                    }
                } else {
                    Task::Sibling { is_right: false }
                });
            }
            Task::Merge(range) => {
                let (Some(right), Some(left)) = (values.pop(), values.pop()) else {
                    return reject("value stack underflow");
                };
                values.push(if range.is_stored() {
                    Node::merge(&left, &right, 0)
                } else {
                    Node::bag(&right, &left, 0)
                });
            }
        }
    }

    if elements.next().is_some() {
        return reject("unconsumed elements");
    }
    match values.as_slice() {
        [root] => root_matches(proof, &root.hash, &root.weight),
        _ => reject("traversal did not reduce to one root"),
    }
}

fn root_matches(proof: &Proof, hash: &Hash, weight: &Weight) -> bool {
    if *hash != proof.root_hash {
        return reject("root hash mismatch");
    }
    if *weight != proof.root_weight {
        return reject("root weight mismatch");
    }
    true
}
