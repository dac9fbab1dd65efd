//! Lookup tables built from decoded DBC data.
//!
//! These are projections over an immutable [`RecordTable`] and its
//! [`StringPool`]. Once built they own everything they need, so the decoded
//! table can be dropped.

use std::hash::BuildHasherDefault;

use dbcore_dbc::{Record, RecordTable, StringPool};
use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use tracing::warn;

use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Longest description shown unshortened in a label.
pub const LABEL_MAX_CHARS: usize = 30;

fn require_u32(record: &Record, field: &str, row: usize) -> Result<u32> {
    record.get_u32(field).ok_or_else(|| Error::MissingField {
        field: field.to_string(),
        row,
    })
}

/// Text at the string offset held in `field`, with `0` meaning no text.
fn pool_text(strings: &StringPool, record: &Record, field: &str, row: usize) -> Result<String> {
    let offset = require_u32(record, field, row)?;
    if offset == 0 {
        return Ok(String::new());
    }
    Ok(match strings.get(offset) {
        Some(text) => text.to_string(),
        None => {
            warn!(field, row, offset, "string offset has no entry in the pool");
            String::new()
        }
    })
}

/// An item subclass and its display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSubClass {
    pub id: u32,
    pub name: String,
}

/// Item subclasses keyed by `"{class}-{subclass}"`.
#[derive(Debug, Clone, Default)]
pub struct ItemSubClassLookups {
    lookups: FxHashMap<String, ItemSubClass>,
}

impl ItemSubClassLookups {
    /// Build from an `ItemSubClass` table.
    ///
    /// Uses the `Class`, `subClass` and `displayName` columns. If two rows
    /// share a key, the first one wins.
    pub fn build(table: &RecordTable, strings: &StringPool) -> Result<Self> {
        let mut lookups = FxHashMap::with_capacity_and_hasher(table.len(), Default::default());

        for (row, record) in table.iter().enumerate() {
            let class = require_u32(record, "Class", row)?;
            let id = require_u32(record, "subClass", row)?;
            let name = pool_text(strings, record, "displayName", row)?;

            lookups
                .entry(Self::key(class, id))
                .or_insert(ItemSubClass { id, name });
        }

        Ok(Self { lookups })
    }

    fn key(class: u32, subclass: u32) -> String {
        format!("{}-{}", class, subclass)
    }

    /// Get a subclass entry.
    pub fn get(&self, class: u32, subclass: u32) -> Option<&ItemSubClass> {
        self.lookups.get(&Self::key(class, subclass))
    }

    /// Get a subclass entry, or an empty one if there is none.
    pub fn lookup(&self, class: u32, subclass: u32) -> ItemSubClass {
        self.get(class, subclass).cloned().unwrap_or_default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    /// Check whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }
}

/// One selectable spell description variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionVariable {
    pub id: u32,
    /// Full formula text.
    pub description: String,
    /// `"{id}: {description}"`, shortened to fit a list row.
    pub label: String,
    /// `"{id}: {description}"`, unshortened.
    pub tooltip: String,
    /// Position in the list.
    pub index: usize,
}

/// Spell description variables in selection order.
///
/// The first entry is always a placeholder with id `0`.
#[derive(Debug, Clone)]
pub struct DescriptionVariables {
    entries: Vec<DescriptionVariable>,
}

impl DescriptionVariables {
    /// Build from a `SpellDescriptionVariables` table using its `ID` and
    /// `Formula` columns.
    pub fn build(table: &RecordTable, strings: &StringPool) -> Result<Self> {
        let mut entries = Vec::with_capacity(table.len() + 1);
        entries.push(DescriptionVariable {
            id: 0,
            description: String::new(),
            label: "0".to_string(),
            tooltip: String::new(),
            index: 0,
        });

        for (row, record) in table.iter().enumerate() {
            let id = require_u32(record, "ID", row)?;
            let description = pool_text(strings, record, "Formula", row)?;

            entries.push(DescriptionVariable {
                id,
                label: format!("{}: {}", id, shorten(&description)),
                tooltip: format!("{}: {}", id, description),
                description,
                index: row + 1,
            });
        }

        Ok(Self { entries })
    }

    /// List position of the first entry with `id`, or `0` if there is none.
    pub fn index_of(&self, id: u32) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map_or(0, |entry| entry.index)
    }

    /// Entries in list order.
    pub fn entries(&self) -> &[DescriptionVariable] {
        &self.entries
    }

    /// Iterate over entries in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, DescriptionVariable> {
        self.entries.iter()
    }

    /// Number of entries, including the placeholder.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the placeholder is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn shorten(description: &str) -> String {
    if description.chars().count() <= LABEL_MAX_CHARS {
        description.to_string()
    } else {
        let mut short: String = description.chars().take(LABEL_MAX_CHARS - 1).collect();
        short.push_str("...");
        short
    }
}
