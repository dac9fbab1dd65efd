//! Error types for binding handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or looking up bindings.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No binding is registered under the requested name.
    #[error("binding not found: {0}")]
    SchemaNotFound(String),

    /// A binding file line could not be parsed.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Two columns of one binding share a name.
    #[error("binding {binding} declares field {field} more than once")]
    DuplicateField { binding: String, field: String },

    /// Invalid binding directory pattern.
    #[error("invalid binding directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Error while walking the binding directory.
    #[error("failed to read binding directory: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, Error>;
