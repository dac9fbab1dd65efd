//! Error types for dbcore-common.

use thiserror::Error;

/// Common error type for dbcore operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes remain than a read requires.
    #[error("truncated input at position {position}: needed {needed} bytes but only {available} available")]
    TruncatedInput {
        needed: u64,
        available: u64,
        position: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
