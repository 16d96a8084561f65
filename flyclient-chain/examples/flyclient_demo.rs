//! Grow a chain, prove it, and check the proof as a light client.
//!
//! Run with `RUST_LOG=debug` to see each block and the verifier's decisions.

use anyhow::{ensure, Context};
use flyclient_chain::{Block, BlockChain, ChainConfig, MemoryBlockStore};
use flyclient_core::Weight;
use flyclient_light::ProofVerifier;
use tracing::info;
use tracing_subscriber::EnvFilter;

const BLOCKS: u64 = 2_000;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ChainConfig::default();
    let chain = BlockChain::new(config.clone(), MemoryBlockStore::new())
        .context("failed to create chain")?;

    for number in 1..BLOCKS {
        let difficulty = Weight::from(100_000u64 + number % 1_000);
        chain.insert_block(Block::new(number, number, difficulty))?;
    }
    let head = chain.head();
    info!(head = %head, total = %chain.total_difficulty()?, "chain grown");

    let proof = chain.prove().context("failed to build proof")?;
    let bytes = proof.to_bytes()?;
    info!(
        queries = proof.queried_leaves.len(),
        disclosed = proof.leaf_elements(),
        elements = proof.elements.len(),
        bytes = bytes.len(),
        "proof built"
    );

    // The light client holds only the head header and the parameters.
    let received = flyclient_light::Proof::from_bytes(&bytes)?;
    ensure!(received.root_hash == head.mmr_root, "proof does not match head");
    let verifier = ProofVerifier::new(config.flyclient.clone())?;
    let accepted = verifier.verify(&received, &config.tail_weight())?;
    ensure!(accepted, "proof rejected");

    info!(blocks = BLOCKS, "light client accepted the chain");
    Ok(())
}
