//! Minimal proof-of-work chain backed by a FlyClient accumulator.
//!
//! Each block header commits to the accumulator root over its ancestors,
//! which lets a full node hand light clients a succinct proof of the
//! work behind its head:
//!
//! ```rust
//! use flyclient_chain::{Block, BlockChain, ChainConfig, MemoryBlockStore};
//! use flyclient_core::Weight;
//!
//! let chain = BlockChain::new(ChainConfig::default(), MemoryBlockStore::new()).unwrap();
//! for number in 1..=10 {
//!     chain
//!         .insert_block(Block::new(number, number, Weight::from(100_000u32)))
//!         .unwrap();
//! }
//!
//! let proof = chain.prove().unwrap();
//! assert_eq!(proof.root_hash, chain.head().mmr_root);
//! assert!(chain.verify(&proof).unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod block;
pub mod chain;
pub mod config;
pub mod errors;
pub mod store;

pub use block::Block;
pub use chain::{BlockChain, MIN_PROOF_BLOCKS};
pub use config::{ChainConfig, ChainConfigBuilder, DEFAULT_TAIL_DIFFICULTY};
pub use errors::{ChainError, Result};
pub use store::{BlockStore, MemoryBlockStore};
