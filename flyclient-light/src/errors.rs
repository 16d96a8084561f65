//! Error types for proof verification.

use thiserror::Error;

/// Errors that stop verification before a verdict is reached.
///
/// A proof that is well-formed enough to be checked but wrong is not an
/// error; `verify` reports it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The proof carries a different number of weighted samples than the
    /// security parameters require.
    #[error("query count mismatch: required {required}, provided {provided}")]
    QueryCountMismatch {
        /// Samples required for the proof's root and the tail weight.
        required: u64,
        /// Samples present in the proof.
        provided: u64,
    },

    /// The parameters admit no sample count (zero weights, degenerate
    /// security settings).
    #[error("parameter error: {0}")]
    Parameter(#[from] flyclient_core::Error),
}
