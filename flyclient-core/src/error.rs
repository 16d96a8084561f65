//! Error types for FlyClient.
//!
//! Provides structured errors with:
//! - Unique error codes for reporting
//! - Source error chaining
//! - Caller-misuse vs internal-fault categorization

use thiserror::Error;

/// Result type for FlyClient operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes.
///
/// Codes are structured as:
/// - 1xxx: Validation errors (caller)
/// - 2xxx: Range errors (caller)
/// - 5xxx: Storage errors (environment)
/// - 6xxx: Internal errors (bugs, encoding)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Validation errors (1xxx)
    InvalidHash = 1001,
    InvalidParameter = 1002,

    // Range errors (2xxx)
    OutOfRange = 2003,

    // Storage errors (5xxx)
    StorageWrite = 5002,

    // Internal errors (6xxx)
    Serialization = 6001,
    InvariantViolation = 6002,
}

impl ErrorCode {
    /// Get the numeric code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Check if this error was caused by the caller.
    pub fn is_client_error(self) -> bool {
        (1000..5000).contains(&self.code())
    }

    /// Check if this error was caused by the environment or a bug.
    pub fn is_server_error(self) -> bool {
        self.code() >= 5000
    }

    /// Check if this error is retryable.
    ///
    /// Every algorithm here is a pure function of its inputs; only the
    /// storage collaborators can succeed on a second attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorCode::StorageWrite)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Errors that can occur in FlyClient.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid hash format or value.
    #[error("[{code}] invalid hash: {message}")]
    InvalidHash {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A protocol or configuration parameter is outside its domain.
    #[error("[{code}] invalid parameter: {message}")]
    InvalidParameter { code: ErrorCode, message: String },

    /// An index lies outside the accumulator.
    #[error("[{code}] out of range: {message}")]
    OutOfRange { code: ErrorCode, message: String },

    /// Storage operation failed.
    #[error("[{code}] storage error: {message}")]
    Storage {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization failed.
    #[error("[{code}] serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal structural invariant does not hold.
    #[error("[{code}] invariant violation: {message}")]
    InvariantViolation { code: ErrorCode, message: String },
}

impl Error {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidHash { code, .. } => *code,
            Error::InvalidParameter { code, .. } => *code,
            Error::OutOfRange { code, .. } => *code,
            Error::Storage { code, .. } => *code,
            Error::Serialization { code, .. } => *code,
            Error::InvariantViolation { code, .. } => *code,
        }
    }

    /// Check if this is a caller error.
    pub fn is_client_error(&self) -> bool {
        self.code().is_client_error()
    }

    /// Check if this is an environment or internal error.
    pub fn is_server_error(&self) -> bool {
        self.code().is_server_error()
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Create an InvalidHash error.
    pub fn invalid_hash(message: impl Into<String>) -> Self {
        Error::InvalidHash {
            code: ErrorCode::InvalidHash,
            message: message.into(),
            source: None,
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            code: ErrorCode::InvalidParameter,
            message: message.into(),
        }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Error::OutOfRange {
            code: ErrorCode::OutOfRange,
            message: message.into(),
        }
    }

    /// Create a Storage error for a failed write.
    pub fn storage_write(message: impl Into<String>) -> Self {
        Error::Storage {
            code: ErrorCode::StorageWrite,
            message: message.into(),
            source: None,
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Error::Serialization {
            code: ErrorCode::Serialization,
            message: message.into(),
            source: None,
        }
    }

    /// Create an InvariantViolation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            code: ErrorCode::InvariantViolation,
            message: message.into(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization {
            code: ErrorCode::Serialization,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            code: ErrorCode::Serialization,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidHash {
            code: ErrorCode::InvalidHash,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}
