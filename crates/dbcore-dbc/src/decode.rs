//! One-shot decoding.

use std::path::Path;

use dbcore_binding::{Binding, SchemaProvider};

use crate::{DbcHeader, DbcReader, RecordTable, Result, StringPool};

/// Everything decoded from one DBC file.
#[derive(Debug, Clone, PartialEq)]
pub struct DbcFile {
    pub header: DbcHeader,
    pub records: RecordTable,
    pub strings: StringPool,
}

impl DbcFile {
    /// Split into header, records and string pool.
    pub fn into_parts(self) -> (DbcHeader, RecordTable, StringPool) {
        (self.header, self.records, self.strings)
    }
}

/// Decode `path` with the binding `provider` holds under `binding_name`.
///
/// The binding is looked up before the file is opened.
pub fn decode<P, S>(path: P, provider: &S, binding_name: &str) -> Result<DbcFile>
where
    P: AsRef<Path>,
    S: SchemaProvider + ?Sized,
{
    let binding = provider.lookup(binding_name)?;
    decode_with_binding(path, &binding)
}

/// Decode `path` with an explicit binding.
pub fn decode_with_binding<P: AsRef<Path>>(path: P, binding: &Binding) -> Result<DbcFile> {
    let (header, records) = DbcReader::open(path)?.read_header()?;
    let (records, strings) = records.read_records(binding)?;
    let strings = strings.read_string_pool()?;

    Ok(DbcFile {
        header,
        records,
        strings,
    })
}

/// Read only the header and string pool of `path`, skipping the records.
pub fn read_strings<P: AsRef<Path>>(path: P) -> Result<(DbcHeader, StringPool)> {
    let (header, records) = DbcReader::open(path)?.read_header()?;
    let strings = records.skip_records()?.read_string_pool()?;
    Ok((header, strings))
}

#[cfg(test)]
mod tests {
    use dbcore_binding::{BindingField, BindingRegistry, BindingType};

    use super::*;
    use crate::fixture::{dbc_bytes, header, id_value_rows, write_temp};
    use crate::{Error, FieldValue, Mismatch};

    fn id_value_binding() -> Binding {
        Binding::new(
            "IdValue",
            vec![
                BindingField::new("ID", BindingType::UInt),
                BindingField::new("Value", BindingType::Float),
            ],
        )
        .unwrap()
    }

    fn registry() -> BindingRegistry {
        let mut registry = BindingRegistry::new();
        registry.register(id_value_binding());
        registry
    }

    #[test]
    fn test_decode_three_records() {
        let rows = id_value_rows(&[(1, 0.5), (2, 1.5), (3, 2.5)]);
        let file = write_temp(&dbc_bytes(header(3, 2, 8, 0), &rows, &[]));

        let dbc = decode(file.path(), &registry(), "IdValue").unwrap();

        assert_eq!(dbc.header.record_count, 3);
        assert_eq!(dbc.records.len(), 3);
        for record in &dbc.records {
            assert_eq!(record.field_names(), ["ID", "Value"]);
        }
        assert_eq!(dbc.records.find_by_id(2).unwrap().get_f32("Value"), Some(1.5));
        assert!(dbc.strings.is_empty());
    }

    #[test]
    fn test_consumed_bytes_match_file_size() {
        let rows = id_value_rows(&[(7, 1.0), (8, 2.0)]);
        let pool = b"\0name\0";
        let bytes = dbc_bytes(header(2, 2, 8, pool.len() as i32), &rows, pool);
        let file = write_temp(&bytes);

        let dbc = decode_with_binding(file.path(), &id_value_binding()).unwrap();

        assert_eq!(dbc.header.expected_file_size(), Some(bytes.len() as u64));
        assert_eq!(dbc.strings.get(1), Some("name"));
    }

    #[test]
    fn test_unknown_binding_fails_before_reading() {
        let err = decode("does/not/exist.dbc", &registry(), "Missing").unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(dbcore_binding::Error::SchemaNotFound(ref name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = decode("does/not/exist.dbc", &registry(), "IdValue").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.path(), Some(Path::new("does/not/exist.dbc")));
    }

    #[test]
    fn test_truncated_mid_record() {
        let rows = id_value_rows(&[(1, 0.0), (2, 0.0)]);
        let file = write_temp(&dbc_bytes(header(5, 2, 8, 0), &rows, &[]));

        let err = decode_with_binding(file.path(), &id_value_binding()).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { .. }), "{:?}", err);
        assert_eq!(err.path(), Some(file.path()));
    }

    #[test]
    fn test_short_header() {
        let file = write_temp(&[0x57, 0x44, 0x42, 0x43, 1, 0, 0]);

        let err = decode_with_binding(file.path(), &id_value_binding()).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { needed: 20, .. }));
    }

    #[test]
    fn test_schema_width_mismatch_is_reported() {
        let file = write_temp(&dbc_bytes(header(1, 2, 10, 0), &[0u8; 10], &[]));

        match decode_with_binding(file.path(), &id_value_binding()) {
            Err(Error::SchemaMismatch {
                mismatch: Mismatch::RecordSize { expected, actual },
                binding,
                ..
            }) => {
                assert_eq!(binding, "IdValue");
                assert_eq!(expected, 8);
                assert_eq!(actual, 10);
            }
            other => panic!("expected record size mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_read_strings_skips_records() {
        let rows = id_value_rows(&[(1, 0.0), (2, 0.0)]);
        let pool = b"abc\0\0hello\0";
        let file = write_temp(&dbc_bytes(header(2, 2, 8, pool.len() as i32), &rows, pool));

        let (header, strings) = read_strings(file.path()).unwrap();

        assert_eq!(header.record_count, 2);
        let entries: Vec<_> = strings
            .iter()
            .map(|e| (e.byte_offset, e.text.as_str()))
            .collect();
        assert_eq!(entries, [(0, "abc"), (4, ""), (5, "hello")]);
    }

    #[test]
    fn test_string_offset_column_resolves() {
        let binding = Binding::parse("SpellDescriptionVariables", "uint ID\nstring_offset Formula\n").unwrap();
        let mut rows = Vec::new();
        for (id, offset) in [(10u32, 1u32), (11, 0)] {
            rows.extend_from_slice(&id.to_le_bytes());
            rows.extend_from_slice(&offset.to_le_bytes());
        }
        let pool = b"\0$s1*2\0";
        let file = write_temp(&dbc_bytes(header(2, 2, 8, pool.len() as i32), &rows, pool));

        let dbc = decode_with_binding(file.path(), &binding).unwrap();
        let record = dbc.records.find_by_id(10).unwrap();

        assert_eq!(record.get("Formula"), Some(&FieldValue::UInt32(1)));
        assert_eq!(dbc.strings.get_or_empty(record.get_u32("Formula").unwrap()), "$s1*2");
        assert_eq!(dbc.strings.get(0), Some(""));
    }
}
