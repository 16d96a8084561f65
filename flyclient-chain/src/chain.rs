//! Chain state and FlyClient proving.
//!
//! Every inserted block is appended to the accumulator as a leaf
//! `(block hash, difficulty)`. A block's `mmr_root` is the root before its
//! own leaf is appended, so the head commits to all of its ancestors and a
//! light client can check a proof against the head alone.

use flyclient_core::{Hash, Weight};
use flyclient_light::{Proof, ProofBuilder, ProofVerifier};
use flyclient_mmr::Accumulator;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::config::ChainConfig;
use crate::errors::{ChainError, Result};
use crate::store::BlockStore;

/// Blocks needed before the chain can be proven: genesis carries no work
/// and the head is excluded from its own proof.
pub const MIN_PROOF_BLOCKS: u64 = 3;

#[derive(Debug)]
struct ChainState {
    accumulator: Accumulator,
    head: Block,
}

/// A linear proof-of-work chain committed to a weighted MMR.
#[derive(Debug)]
pub struct BlockChain<S: BlockStore> {
    config: ChainConfig,
    store: S,
    state: RwLock<ChainState>,
    builder: ProofBuilder,
    verifier: ProofVerifier,
}

impl<S: BlockStore> BlockChain<S> {
    /// Create a chain holding only the genesis block.
    pub fn new(config: ChainConfig, store: S) -> Result<Self> {
        config.validate()?;
        let builder = ProofBuilder::new(config.flyclient.clone())?;
        let verifier = ProofVerifier::new(config.flyclient.clone())?;

        let genesis = Block::genesis();
        let hash = store.put_block(&genesis)?;
        let mut accumulator = Accumulator::in_memory();
        accumulator.append(hash, genesis.difficulty.clone())?;
        info!(genesis = %hash, "chain initialized");

        Ok(Self {
            config,
            store,
            state: RwLock::new(ChainState {
                accumulator,
                head: genesis,
            }),
            builder,
            verifier,
        })
    }

    /// Chain configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Underlying block store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Link `block` to the head and append it.
    ///
    /// `parent` and `mmr_root` are overwritten; the linked block is returned.
    pub fn insert_block(&self, mut block: Block) -> Result<Block> {
        if block.is_genesis() {
            return Err(ChainError::GenesisInsert);
        }

        let mut state = self.state.write();
        block.parent = state.head.hash();
        block.mmr_root = state.accumulator.root_hash()?;

        let hash = block.hash();
        state.accumulator.append(hash, block.difficulty.clone())?;
        if let Err(err) = self.store.put(hash, block.encode()) {
            state.accumulator.remove_last()?;
            warn!(number = block.number, error = %err, "block store rejected block");
            return Err(err.into());
        }
        state.head = block.clone();

        debug!(
            number = block.number,
            hash = %hash,
            leaf_count = state.accumulator.leaf_count(),
            "block inserted"
        );
        Ok(block)
    }

    /// Current head block.
    pub fn head(&self) -> Block {
        self.state.read().head.clone()
    }

    /// Number of blocks including genesis.
    pub fn len(&self) -> u64 {
        self.state.read().accumulator.leaf_count()
    }

    /// Always false: genesis is inserted on creation.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root over every block including the head.
    pub fn root(&self) -> Result<Hash> {
        Ok(self.state.read().accumulator.root_hash()?)
    }

    /// Total work including the head.
    pub fn total_difficulty(&self) -> Result<Weight> {
        Ok(self
            .state
            .read()
            .accumulator
            .root_weight()?
            .unwrap_or_default())
    }

    /// Look up a stored block.
    pub fn get_block(&self, hash: &Hash) -> Result<Option<Block>> {
        Ok(self.store.get_block(hash)?)
    }

    /// Snapshot of the accumulator without the head's leaf.
    ///
    /// Its root equals the head's `mmr_root`.
    pub fn tail_accumulator(&self) -> Result<Accumulator> {
        let mut tail = self.state.read().accumulator.snapshot();
        tail.remove_last()?;
        Ok(tail)
    }

    /// Prove the chain up to, but excluding, the head.
    ///
    /// The head's difficulty is covered by the configured tail difficulty.
    pub fn prove(&self) -> Result<Proof> {
        let blocks = self.len();
        if blocks < MIN_PROOF_BLOCKS {
            return Err(ChainError::TooShort {
                blocks,
                required: MIN_PROOF_BLOCKS,
            });
        }
        let tail = self.tail_accumulator()?;
        let proof = self.builder.prove(&tail, &self.config.tail_weight())?;
        info!(
            blocks,
            queries = proof.queried_leaves.len(),
            elements = proof.elements.len(),
            "chain proof built"
        );
        Ok(proof)
    }

    /// Check a proof against the current head.
    pub fn verify(&self, proof: &Proof) -> Result<bool> {
        let (commitment, ancestors) = {
            let state = self.state.read();
            (
                state.head.mmr_root,
                state.accumulator.leaf_count().saturating_sub(1),
            )
        };
        if proof.root_hash != commitment {
            debug!(root = %proof.root_hash, "proof root does not match head commitment");
            return Ok(false);
        }
        if proof.leaf_count != ancestors {
            debug!(
                leaf_count = proof.leaf_count,
                ancestors, "proof leaf count does not match head"
            );
            return Ok(false);
        }
        Ok(self.verifier.verify(proof, &self.config.tail_weight())?)
    }
}
