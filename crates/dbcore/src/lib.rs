//! dbcore - DBC game data table decoding.
//!
//! This crate provides a unified interface to the dbcore crates:
//!
//! - [`dbcore_common`] - Sequential binary cursor and low-level errors
//! - [`dbcore_binding`] - Column layouts ("bindings") and the binding registry
//! - [`dbcore_dbc`] - Header, record and string pool decoding, record lookup
//!
//! On top of those it adds [`DbcLibrary`], which pairs a directory of DBC
//! files with a directory of bindings, and the lookup tables in [`lookups`].
//!
//! # Example
//!
//! ```no_run
//! use dbcore::prelude::*;
//!
//! let library = DbcLibrary::open("DBC", "Bindings")?;
//! let dbc = library.load("SpellDescriptionVariables")?;
//!
//! let vars = DescriptionVariables::build(&dbc.records, &dbc.strings)?;
//! for var in vars.iter() {
//!     println!("{}", var.label);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod library;

pub mod lookups;

// Re-export all sub-crates
pub use dbcore_binding as binding;
pub use dbcore_common as common;
pub use dbcore_dbc as dbc;

pub use error::{Error, Result};
pub use library::{binding_name, DbcLibrary, DBC_EXTENSION};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::lookups::{DescriptionVariables, ItemSubClassLookups};
    pub use crate::DbcLibrary;
    pub use dbcore_binding::{Binding, BindingRegistry, BindingType, SchemaProvider};
    pub use dbcore_dbc::{
        decode, find_by_field, DbcFile, DbcHeader, DbcReader, FieldValue, Record, RecordTable,
        StringPool,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
