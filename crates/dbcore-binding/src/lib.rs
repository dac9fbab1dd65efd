//! Field layout bindings for DBC tables.
//!
//! A DBC file carries no type information of its own: its rows are plain
//! fixed-width bytes. A [`Binding`] describes one table's row layout as an
//! ordered list of named, typed columns, and a [`SchemaProvider`] hands out
//! bindings by table name.
//!
//! # Example
//!
//! ```
//! use dbcore_binding::{Binding, BindingRegistry, BindingType, SchemaProvider};
//!
//! let binding = Binding::parse("SpellDescriptionVariables", "uint ID\nstring_offset Formula\n")?;
//! assert_eq!(binding.record_size(), 8);
//! assert_eq!(binding.fields()[1].ty, BindingType::StringOffset);
//!
//! let mut registry = BindingRegistry::new();
//! registry.register(binding);
//! assert!(registry.lookup("SpellDescriptionVariables").is_ok());
//! # Ok::<(), dbcore_binding::Error>(())
//! ```

mod binding;
mod error;
mod registry;

pub use binding::{Binding, BindingField, BindingType};
pub use error::{Error, Result};
pub use registry::{BindingRegistry, SchemaProvider};

/// File extension of binding files loaded by [`BindingRegistry::load_dir`].
pub const BINDING_EXTENSION: &str = "txt";
