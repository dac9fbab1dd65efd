//! DBC table decoder.
//!
//! A DBC file is a fixed-schema binary table: a 20-byte header, a record area
//! of `record_count` rows of `record_size` bytes, and a trailing pool of
//! NUL-terminated strings. The file carries no column types; a
//! [`Binding`](dbcore_binding::Binding) supplies them, and is checked against
//! the header before any row is decoded.
//!
//! # Quick Start
//!
//! ```no_run
//! use dbcore_binding::BindingRegistry;
//!
//! let registry = BindingRegistry::from_dir("Bindings")?;
//! let dbc = dbcore_dbc::decode("DBC/SpellIcon.dbc", &registry, "SpellIcon")?;
//!
//! if let Some(icon) = dbc.records.find_by_id(1) {
//!     let name = icon.get_u32("Name").map(|offset| dbc.strings.get_or_empty(offset));
//!     println!("icon 1: {:?}", name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Phases
//!
//! [`decode`] runs all three phases. For finer control, drive [`DbcReader`]
//! directly: [`DbcReader::read_header`] yields a [`RecordArea`], whose
//! [`read_records`](RecordArea::read_records) or
//! [`skip_records`](RecordArea::skip_records) yields a [`StringBlock`].
//!
//! # String Offsets
//!
//! String columns decode as plain [`FieldValue::UInt32`] byte offsets.
//! [`StringPool::get`] returns `None` for an offset with no string; whether
//! offset `0` means "no string" is up to the caller.

mod decode;
mod error;
mod header;
mod reader;
mod record;
mod strings;
mod value;

#[cfg(test)]
mod fixture;

pub use decode::{decode, decode_with_binding, read_strings, DbcFile};
pub use error::{Error, Mismatch, PoolDefect, Result};
pub use header::{DbcHeader, RawDbcHeader};
pub use reader::{DbcReader, RecordArea, StringBlock};
pub use record::{find_by_field, Columns, Record, RecordTable, ID_FIELD};
pub use strings::{StringPool, StringPoolEntry};
pub use value::FieldValue;
