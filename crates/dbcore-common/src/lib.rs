//! Common utilities for dbcore.
//!
//! This crate provides the foundational pieces shared by the other dbcore crates:
//!
//! - [`StreamReader`] - Sequential little-endian cursor over a file or any `Read + Seek` source
//! - [`Error`] - Errors raised while reading raw bytes

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::{FileReader, StreamReader};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
