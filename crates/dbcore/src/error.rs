//! Error types for the dbcore facade.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`DbcLibrary`](crate::DbcLibrary) and the projections.
#[derive(Debug, Error)]
pub enum Error {
    /// Decoding error.
    #[error("{0}")]
    Dbc(#[from] dbcore_dbc::Error),

    /// Binding error.
    #[error("{0}")]
    Binding(#[from] dbcore_binding::Error),

    /// A projection needs a column the table does not have.
    #[error("row {row} has no unsigned field {field}")]
    MissingField { field: String, row: usize },

    /// A file name does not yield a binding name.
    #[error("cannot derive a binding name from {}", .0.display())]
    NoBindingName(PathBuf),

    /// Invalid file filter.
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Error while listing the DBC directory.
    #[error("failed to read DBC directory: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
