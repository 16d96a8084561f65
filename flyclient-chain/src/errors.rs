//! Chain error types.

use thiserror::Error;

/// Errors specific to chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("block number 0 is reserved for genesis")]
    GenesisInsert,

    #[error("chain has {blocks} blocks; proofs need at least {required}")]
    TooShort { blocks: u64, required: u64 },

    #[error("verification failed: {0}")]
    Verify(#[from] flyclient_light::VerifyError),

    #[error("core error: {0}")]
    Core(#[from] flyclient_core::Error),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
