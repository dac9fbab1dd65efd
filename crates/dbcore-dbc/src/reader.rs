//! Phase-ordered DBC reader.
//!
//! A DBC file is read in three phases that share one cursor: header, record
//! area, string pool. Each phase consumes the value returned by the previous
//! one, so the phases cannot be run out of order.
//!
//! ```no_run
//! use dbcore_binding::Binding;
//! use dbcore_dbc::DbcReader;
//!
//! let binding = Binding::parse("SpellIcon", "uint ID\nstring_offset Name\n")?;
//!
//! let (header, records) = DbcReader::open("SpellIcon.dbc")?.read_header()?;
//! let (table, strings) = records.read_records(&binding)?;
//! let pool = strings.read_string_pool()?;
//!
//! println!("{} records, {} strings", header.record_count, pool.len());
//! # let _ = table;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dbcore_binding::{Binding, BindingType};
use dbcore_common::StreamReader;
use tracing::{debug, warn};

use crate::header::RawDbcHeader;
use crate::record::{Columns, Record, RecordTable};
use crate::{DbcHeader, Error, FieldValue, Mismatch, PoolDefect, Result, StringPool};

/// Entry point of a DBC read: a cursor at the start of the file.
#[derive(Debug)]
pub struct DbcReader<R> {
    path: PathBuf,
    reader: StreamReader<R>,
}

/// Second phase: a cursor at the start of the record area.
#[derive(Debug)]
pub struct RecordArea<R> {
    path: PathBuf,
    reader: StreamReader<R>,
    header: DbcHeader,
}

/// Third phase: a cursor at the start of the string pool.
#[derive(Debug)]
pub struct StringBlock<R> {
    path: PathBuf,
    reader: StreamReader<R>,
    header: DbcHeader,
}

impl DbcReader<BufReader<File>> {
    /// Open a DBC file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = dbcore_common::FileReader::open(path).map_err(|e| Error::read(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader,
        })
    }
}

impl<R: Read + Seek> DbcReader<R> {
    /// Read from an arbitrary seekable source. `path` only labels errors.
    pub fn new(path: impl Into<PathBuf>, source: R) -> Result<Self> {
        let path = path.into();
        let reader = StreamReader::new(source).map_err(|e| Error::read(&path, e))?;
        Ok(Self { path, reader })
    }

    /// The path errors are reported against.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the 20-byte header.
    pub fn read_header(mut self) -> Result<(DbcHeader, RecordArea<R>)> {
        let header: DbcHeader = self
            .reader
            .read_struct::<RawDbcHeader>()
            .map_err(|e| Error::read(&self.path, e))?
            .into();

        debug!(
            path = %self.path.display(),
            magic = header.magic,
            record_count = header.record_count,
            field_count = header.field_count,
            record_size = header.record_size,
            string_block_size = header.string_block_size,
            "read DBC header"
        );

        Ok((
            header,
            RecordArea {
                path: self.path,
                reader: self.reader,
                header,
            },
        ))
    }
}

/// Wire encoding of a column, resolved from its binding type.
#[derive(Debug, Clone, Copy)]
enum WireType {
    Int32,
    UInt32,
    UInt8,
    Float32,
    Float64,
}

impl WireType {
    fn resolve(ty: &BindingType) -> Option<Self> {
        match ty {
            BindingType::Int => Some(WireType::Int32),
            BindingType::UInt | BindingType::StringOffset => Some(WireType::UInt32),
            BindingType::UInt8 => Some(WireType::UInt8),
            BindingType::Float => Some(WireType::Float32),
            BindingType::Double => Some(WireType::Float64),
            BindingType::Unknown(_) => None,
        }
    }

    fn read<R: Read + Seek>(self, reader: &mut StreamReader<R>) -> dbcore_common::Result<FieldValue> {
        Ok(match self {
            WireType::Int32 => FieldValue::Int32(reader.read_i32()?),
            WireType::UInt32 => FieldValue::UInt32(reader.read_u32()?),
            WireType::UInt8 => FieldValue::UInt8(reader.read_u8()?),
            WireType::Float32 => FieldValue::Float32(reader.read_f32()?),
            WireType::Float64 => FieldValue::Float64(reader.read_f64()?),
        })
    }
}

impl<R: Read + Seek> RecordArea<R> {
    /// The decoded header.
    #[inline]
    pub fn header(&self) -> &DbcHeader {
        &self.header
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    fn mismatch(&self, binding: &Binding, mismatch: Mismatch) -> Error {
        Error::SchemaMismatch {
            path: self.path.clone(),
            binding: binding.name().to_string(),
            mismatch,
        }
    }

    /// Check `binding` against the header without reading any record bytes.
    fn resolve_layout(&self, binding: &Binding) -> Result<Vec<WireType>> {
        let layout = binding
            .fields()
            .iter()
            .map(|field| {
                WireType::resolve(&field.ty).ok_or_else(|| {
                    self.mismatch(
                        binding,
                        Mismatch::UnknownFieldType {
                            column: field.name.clone(),
                            type_name: field.ty.to_string(),
                        },
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.header.record_size != binding.record_size() {
            return Err(self.mismatch(
                binding,
                Mismatch::RecordSize {
                    expected: binding.record_size(),
                    actual: self.header.record_size,
                },
            ));
        }
        if self.header.field_count != binding.field_count() {
            return Err(self.mismatch(
                binding,
                Mismatch::FieldCount {
                    expected: binding.field_count(),
                    actual: self.header.field_count,
                },
            ));
        }
        if binding.record_size() == 0 && self.header.record_count > 0 {
            return Err(self.mismatch(
                binding,
                Mismatch::ZeroWidthRecords {
                    record_count: self.header.record_count,
                },
            ));
        }

        Ok(layout)
    }

    /// Decode every row using `binding`'s column layout.
    ///
    /// The binding must agree with the header on row width and column count,
    /// and the file must hold the whole record area; otherwise nothing is
    /// decoded.
    pub fn read_records(mut self, binding: &Binding) -> Result<(RecordTable, StringBlock<R>)> {
        let layout = self.resolve_layout(binding)?;
        self.reader
            .ensure(self.header.records_len())
            .map_err(|e| Error::read(&self.path, e))?;

        let columns = Arc::new(Columns::from_binding(binding));
        let record_count = self.header.record_count as usize;
        let mut records = Vec::with_capacity(record_count);

        for _ in 0..record_count {
            let mut values = Vec::with_capacity(layout.len());
            for wire in &layout {
                values.push(wire.read(&mut self.reader).map_err(|e| Error::read(&self.path, e))?);
            }
            records.push(Record::new(columns.clone(), values));
        }

        debug!(
            path = %self.path.display(),
            binding = binding.name(),
            records = records.len(),
            "decoded DBC records"
        );

        let table = RecordTable::new(columns, records);
        Ok((table, self.into_string_block()))
    }

    /// Seek past the record area without decoding it.
    pub fn skip_records(mut self) -> Result<StringBlock<R>> {
        self.reader
            .seek(self.header.string_pool_offset())
            .map_err(|e| Error::read(&self.path, e))?;
        Ok(self.into_string_block())
    }

    fn into_string_block(self) -> StringBlock<R> {
        StringBlock {
            path: self.path,
            reader: self.reader,
            header: self.header,
        }
    }
}

impl<R: Read + Seek> StringBlock<R> {
    /// The decoded header.
    #[inline]
    pub fn header(&self) -> &DbcHeader {
        &self.header
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Read and decode exactly `string_block_size` bytes.
    pub fn read_string_pool(mut self) -> Result<StringPool> {
        let size = usize::try_from(self.header.string_block_size).map_err(|_| {
            Error::MalformedStringPool {
                path: self.path.clone(),
                defect: PoolDefect::NegativeSize(self.header.string_block_size),
            }
        })?;

        let bytes = self
            .reader
            .read_bytes(size)
            .map_err(|e| Error::read(&self.path, e))?;
        let pool = StringPool::decode(&bytes).map_err(|defect| Error::MalformedStringPool {
            path: self.path.clone(),
            defect,
        })?;

        if !self.reader.is_empty() {
            warn!(
                path = %self.path.display(),
                trailing = self.reader.remaining(),
                "unexpected bytes after string pool"
            );
        }

        debug!(
            path = %self.path.display(),
            strings = pool.len(),
            bytes = size,
            "decoded DBC string pool"
        );

        Ok(pool)
    }
}
