//! Decoded records and key lookup.

use std::hash::BuildHasherDefault;
use std::sync::Arc;

use dbcore_binding::Binding;
use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use crate::FieldValue;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Name of the column [`RecordTable::find_by_id`] searches.
pub const ID_FIELD: &str = "ID";

/// Ordered column names shared by every record of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Columns {
    /// Build a column set. Later duplicates of a name are unreachable by name.
    pub fn new(names: Vec<String>) -> Self {
        let mut index = FxHashMap::with_capacity_and_hasher(names.len(), Default::default());
        for (position, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Self { names, index }
    }

    /// Columns of a binding, in binding order.
    pub fn from_binding(binding: &Binding) -> Self {
        Self::new(binding.fields().iter().map(|f| f.name.clone()).collect())
    }

    /// Position of a column by name.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Column names in order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether there are no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One decoded row: column name to value, in column order.
#[derive(Debug, Clone)]
pub struct Record {
    columns: Arc<Columns>,
    values: Vec<FieldValue>,
}

impl Record {
    pub(crate) fn new(columns: Arc<Columns>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Get a value by column name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.columns.position(name).and_then(|i| self.values.get(i))
    }

    /// Get a value by column position.
    #[inline]
    pub fn value(&self, position: usize) -> Option<&FieldValue> {
        self.values.get(position)
    }

    /// Get an unsigned integer column.
    pub fn get_u32(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(FieldValue::as_u32)
    }

    /// Get a signed integer column.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(FieldValue::as_i32)
    }

    /// Get a byte column.
    pub fn get_u8(&self, name: &str) -> Option<u8> {
        self.get(name).and_then(FieldValue::as_u8)
    }

    /// Get a float column.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(FieldValue::as_f32)
    }

    /// Get a float or double column as f64.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    /// Check whether the record has a column.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.position(name).is_some()
    }

    /// Column names in order.
    #[inline]
    pub fn field_names(&self) -> &[String] {
        self.columns.names()
    }

    /// Values in column order.
    #[inline]
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Iterate over `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the record has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.columns.names() == other.columns.names() && self.values == other.values
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// All rows of one DBC file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    columns: Arc<Columns>,
    records: Vec<Record>,
}

impl RecordTable {
    pub(crate) fn new(columns: Arc<Columns>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// The shared column set.
    #[inline]
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the table has no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by row index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// All records in file order.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Find the first record whose `field` holds the unsigned value `value`.
    ///
    /// This is a linear scan. Returns `None` if the column does not exist or
    /// no record matches.
    pub fn find(&self, field: &str, value: u32) -> Option<&Record> {
        let position = self.columns.position(field)?;
        self.records
            .iter()
            .find(|record| record.value(position).and_then(FieldValue::as_u32) == Some(value))
    }

    /// Find the first record whose `ID` column equals `id`.
    #[inline]
    pub fn find_by_id(&self, id: u32) -> Option<&Record> {
        self.find(ID_FIELD, id)
    }

    /// Consume the table, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Find the first record in `table` whose `field` equals `value`.
pub fn find_by_field<'a>(table: &'a RecordTable, field: &str, value: u32) -> Option<&'a Record> {
    table.find(field, value)
}
