//! DBC header structures.

use zerocopy::byteorder::{LittleEndian, I32, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Decoded DBC file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DbcHeader {
    /// File magic. Not validated by the decoder.
    pub magic: u32,
    /// Number of rows.
    pub record_count: u32,
    /// Number of columns per row.
    pub field_count: u32,
    /// Byte width of one row.
    pub record_size: u32,
    /// Byte length of the trailing string pool.
    pub string_block_size: i32,
}

impl DbcHeader {
    /// Header size in bytes.
    pub const SIZE: u64 = 20;

    /// The magic of a well-formed file ("WDBC").
    pub const MAGIC: u32 = u32::from_le_bytes(*b"WDBC");

    /// Check the magic against [`DbcHeader::MAGIC`].
    #[inline]
    pub fn has_valid_magic(&self) -> bool {
        self.magic == Self::MAGIC
    }

    /// Byte length of the record area.
    #[inline]
    pub fn records_len(&self) -> u64 {
        self.record_count as u64 * self.record_size as u64
    }

    /// Absolute offset of the string pool.
    #[inline]
    pub fn string_pool_offset(&self) -> u64 {
        Self::SIZE + self.records_len()
    }

    /// Total file size implied by the header, or `None` if the string block
    /// size is negative.
    pub fn expected_file_size(&self) -> Option<u64> {
        u64::try_from(self.string_block_size)
            .ok()
            .map(|pool| self.string_pool_offset() + pool)
    }
}

/// On-disk layout of the header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawDbcHeader {
    pub magic: U32<LittleEndian>,
    pub record_count: U32<LittleEndian>,
    pub field_count: U32<LittleEndian>,
    pub record_size: U32<LittleEndian>,
    pub string_block_size: I32<LittleEndian>,
}

impl From<RawDbcHeader> for DbcHeader {
    fn from(raw: RawDbcHeader) -> Self {
        Self {
            magic: raw.magic.get(),
            record_count: raw.record_count.get(),
            field_count: raw.field_count.get(),
            record_size: raw.record_size.get(),
            string_block_size: raw.string_block_size.get(),
        }
    }
}

impl From<DbcHeader> for RawDbcHeader {
    fn from(header: DbcHeader) -> Self {
        Self {
            magic: U32::new(header.magic),
            record_count: U32::new(header.record_count),
            field_count: U32::new(header.field_count),
            record_size: U32::new(header.record_size),
            string_block_size: I32::new(header.string_block_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_layout() {
        assert_eq!(std::mem::size_of::<RawDbcHeader>() as u64, DbcHeader::SIZE);

        let header = DbcHeader {
            magic: DbcHeader::MAGIC,
            record_count: 3,
            field_count: 2,
            record_size: 8,
            string_block_size: -1,
        };
        let raw = RawDbcHeader::from(header);
        let bytes = raw.as_bytes();

        assert_eq!(&bytes[..4], b"WDBC");
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &(-1i32).to_le_bytes());
        assert_eq!(DbcHeader::from(RawDbcHeader::read_from_bytes(bytes).unwrap()), header);
    }

    #[test]
    fn test_derived_sizes() {
        let header = DbcHeader {
            magic: 0,
            record_count: 5,
            field_count: 3,
            record_size: 12,
            string_block_size: 7,
        };

        assert!(!header.has_valid_magic());
        assert_eq!(header.records_len(), 60);
        assert_eq!(header.string_pool_offset(), 80);
        assert_eq!(header.expected_file_size(), Some(87));

        let negative = DbcHeader {
            string_block_size: -4,
            ..header
        };
        assert_eq!(negative.expected_file_size(), None);
    }
}
