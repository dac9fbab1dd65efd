//! Test helpers for building DBC files in memory.

use std::io::Write;

use zerocopy::IntoBytes;

use crate::header::RawDbcHeader;
use crate::DbcHeader;

pub(crate) fn header(
    record_count: u32,
    field_count: u32,
    record_size: u32,
    string_block_size: i32,
) -> DbcHeader {
    DbcHeader {
        magic: DbcHeader::MAGIC,
        record_count,
        field_count,
        record_size,
        string_block_size,
    }
}

pub(crate) fn dbc_bytes(header: DbcHeader, rows: &[u8], pool: &[u8]) -> Vec<u8> {
    let mut bytes = RawDbcHeader::from(header).as_bytes().to_vec();
    bytes.extend_from_slice(rows);
    bytes.extend_from_slice(pool);
    bytes
}

/// Rows of `(u32, f32)` pairs.
pub(crate) fn id_value_rows(rows: &[(u32, f32)]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(rows.len() * 8);
    for (id, value) in rows {
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

pub(crate) fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
