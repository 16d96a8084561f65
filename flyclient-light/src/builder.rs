//! Proof construction.

use flyclient_core::{Error, Result, Weight};
use flyclient_mmr::{Accumulator, LeafRange, NodeStore};
use tracing::debug;

use crate::config::FlyClientConfig;
use crate::proof::{Proof, ProofElement};
use crate::sampling::{target_set, Sampler};

/// Pending work of the pre-order descent.
enum Task {
    /// Expand a range; `disclosed[lo..hi]` fall inside it.
    Descend { range: LeafRange, lo: usize, hi: usize },
    /// Emit a range without disclosed leaves as an opaque sibling.
    Sibling { range: LeafRange, is_right: bool },
}

/// Builds FlyClient proofs from an accumulator snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProofBuilder {
    sampler: Sampler,
}

impl ProofBuilder {
    /// Create a builder with validated parameters.
    pub fn new(config: FlyClientConfig) -> Result<Self> {
        Ok(Self {
            sampler: Sampler::new(config)?,
        })
    }

    /// The sampler deciding which leaves are queried.
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Sample `acc` and build the proof disclosing the queried and
    /// checkpoint leaves.
    pub fn prove<S: NodeStore>(&self, acc: &Accumulator<S>, tail: &Weight) -> Result<Proof> {
        let sample = self.sampler.sample(acc, tail)?;
        self.assemble(acc, &sample.disclosed(), sample.queried)
    }

    /// Build a proof disclosing `targets` in addition to the leaves the
    /// tail weight requires to be queried.
    pub fn build<S: NodeStore>(
        &self,
        acc: &Accumulator<S>,
        targets: &[u64],
        tail: &Weight,
    ) -> Result<Proof> {
        let leaf_count = acc.leaf_count();
        if let Some(&bad) = targets.iter().find(|&&i| i >= leaf_count) {
            return Err(Error::out_of_range(format!(
                "target leaf {} >= leaf count {}",
                bad, leaf_count
            )));
        }
        let sample = self.sampler.sample(acc, tail)?;
        let disclosed = target_set(targets, &sample.disclosed());
        self.assemble(acc, &disclosed, sample.queried)
    }

    /// Serialize the descent to the sorted, de-duplicated `disclosed` leaves.
    fn assemble<S: NodeStore>(
        &self,
        acc: &Accumulator<S>,
        disclosed: &[u64],
        queried: Vec<u64>,
    ) -> Result<Proof> {
        let root = acc
            .root()?
            .ok_or_else(|| Error::invalid_parameter("cannot prove an empty accumulator"))?;
        let leaf_count = acc.leaf_count();
        if let Some(&last) = disclosed.last() {
            if last >= leaf_count {
                return Err(Error::out_of_range(format!(
                    "disclosed leaf {} >= leaf count {}",
                    last, leaf_count
                )));
            }
        }

        let mut elements = Vec::new();
        if disclosed.is_empty() {
            elements.push(ProofElement::Sibling {
                hash: root.hash,
                weight: root.weight.clone(),
                is_right: false,
            });
        } else {
            let mut stack = vec![Task::Descend {
                range: LeafRange::root(leaf_count),
                lo: 0,
                hi: disclosed.len(),
            }];
            while let Some(task) = stack.pop() {
                match task {
                    Task::Sibling { range, is_right } => {
                        let node = acc.subtree(range.start, range.count)?;
                        elements.push(ProofElement::Sibling {
                            hash: node.hash,
                            weight: node.weight,
                            is_right,
                        });
                    }
                    Task::Descend { range, lo, hi } => {
                        let Some((left, right)) = range.split() else {
                            let leaf = acc.leaf(range.start)?;
                            elements.push(ProofElement::Leaf {
                                hash: leaf.hash,
                                weight: leaf.weight,
                            });
                            continue;
                        };

                        let mid = lo + disclosed[lo..hi].partition_point(|&i| i < right.start);
                        // pushed right first so the left side is emitted first
                        stack.push(if mid < hi {
                            Task::Descend {
                                range: right,
                                lo: mid,
                                hi,
                            }
                        } else {
                            Task::Sibling {
                                range: right,
                                is_right: true,
                            }
                        });
                        stack.push(if lo < mid {
                            Task::Descend {
                                range: left,
                                lo,
                                hi: mid,
                            }
                        } else {
                            Task::Sibling {
                                range: left,
                                is_right: false,
                            }
                        });
                    }
                }
            }
        }

        elements.push(ProofElement::Root {
            hash: root.hash,
            weight: root.weight.clone(),
            leaf_count,
        });

        debug!(
            leaf_count,
            queries = queried.len(),
            disclosed = disclosed.len(),
            elements = elements.len(),
            "built proof"
        );
        Ok(Proof {
            root_hash: root.hash,
            root_weight: root.weight,
            leaf_count,
            elements,
            disclosed_leaves: disclosed.to_vec(),
            queried_leaves: queried,
        })
    }
}
