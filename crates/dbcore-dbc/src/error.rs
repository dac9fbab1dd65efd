//! Error types for DBC decoding.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur when decoding a DBC file.
///
/// Every variant raised while reading a file carries that file's path.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes remain than a read requires.
    #[error("{}: truncated input at position {position}: needed {needed} bytes but only {available} available", path.display())]
    TruncatedInput {
        path: PathBuf,
        needed: u64,
        available: u64,
        position: u64,
    },

    /// I/O error.
    #[error("{}: I/O error: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The binding does not describe the rows physically present in the file.
    #[error("binding {binding} does not match {}: {mismatch}", path.display())]
    SchemaMismatch {
        path: PathBuf,
        binding: String,
        mismatch: Mismatch,
    },

    /// The string pool cannot be split into NUL-terminated UTF-8 entries.
    #[error("malformed string pool in {}: {defect}", path.display())]
    MalformedStringPool { path: PathBuf, defect: PoolDefect },

    /// Binding lookup error.
    #[error("{0}")]
    Binding(#[from] dbcore_binding::Error),
}

/// How a binding disagrees with a file header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    /// Row width differs.
    #[error("expected record size {expected}, header declares {actual}")]
    RecordSize { expected: u32, actual: u32 },

    /// Column count differs.
    #[error("expected field count {expected}, header declares {actual}")]
    FieldCount { expected: u32, actual: u32 },

    /// A column uses a type keyword with no known wire encoding.
    #[error("column {column} has unknown type `{type_name}`")]
    UnknownFieldType { column: String, type_name: String },

    /// Rows are declared but the binding gives them no width.
    #[error("header declares {record_count} records of zero width")]
    ZeroWidthRecords { record_count: u32 },
}

/// What is wrong with a string pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolDefect {
    /// The header declares a negative pool size.
    #[error("string block size is negative ({0})")]
    NegativeSize(i32),

    /// The pool ends in the middle of a string.
    #[error("string at offset {offset} is not NUL-terminated")]
    Unterminated { offset: u32 },

    /// A string is not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: u32 },
}

impl Error {
    /// Attach a file path to a low-level read error.
    pub(crate) fn read(path: &Path, err: dbcore_common::Error) -> Self {
        match err {
            dbcore_common::Error::TruncatedInput {
                needed,
                available,
                position,
            } => Error::TruncatedInput {
                path: path.to_path_buf(),
                needed,
                available,
                position,
            },
            dbcore_common::Error::Io(source) => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// The file the error was raised for, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::TruncatedInput { path, .. }
            | Error::Io { path, .. }
            | Error::SchemaMismatch { path, .. }
            | Error::MalformedStringPool { path, .. } => Some(path),
            Error::Binding(_) => None,
        }
    }
}

/// Result type for DBC operations.
pub type Result<T> = std::result::Result<T, Error>;
