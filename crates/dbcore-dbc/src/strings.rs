//! String pool decoding.
//!
//! The pool is a flat run of NUL-terminated UTF-8 strings. Records refer to a
//! string by the byte offset at which it starts, so entries are keyed by that
//! offset rather than by their position in the pool.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use crate::PoolDefect;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// One string of the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringPoolEntry {
    /// Offset of the first byte of the string, relative to the pool start.
    pub byte_offset: u32,
    /// Decoded text, without its terminator.
    pub text: String,
}

/// Decoded string pool, addressable by byte offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    entries: Vec<StringPoolEntry>,
    index: FxHashMap<u32, usize>,
    byte_len: u32,
}

impl StringPool {
    /// Decode a raw pool.
    ///
    /// Every byte must belong to a NUL-terminated UTF-8 string; a trailing
    /// unterminated run or invalid UTF-8 is reported with the offset of the
    /// string it occurs in.
    pub fn decode(bytes: &[u8]) -> Result<Self, PoolDefect> {
        let mut entries = Vec::new();
        let mut offset = 0usize;

        while offset < bytes.len() {
            let start = offset as u32;
            let rest = &bytes[offset..];
            let end =
                memchr::memchr(0, rest).ok_or(PoolDefect::Unterminated { offset: start })?;
            let text = std::str::from_utf8(&rest[..end])
                .map_err(|_| PoolDefect::InvalidUtf8 { offset: start })?;

            entries.push(StringPoolEntry {
                byte_offset: start,
                text: text.to_string(),
            });
            offset += end + 1;
        }

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.byte_offset, i))
            .collect();

        Ok(Self {
            entries,
            index,
            byte_len: bytes.len() as u32,
        })
    }

    /// Get the string starting at `offset`.
    ///
    /// Offsets that point into the middle of a string, or past the pool,
    /// have no entry.
    #[inline]
    pub fn get(&self, offset: u32) -> Option<&str> {
        self.index
            .get(&offset)
            .map(|&i| self.entries[i].text.as_str())
    }

    /// Get the string starting at `offset`, or `""` if there is none.
    #[inline]
    pub fn get_or_empty(&self, offset: u32) -> &str {
        self.get(offset).unwrap_or("")
    }

    /// Check whether a string starts at `offset`.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        self.index.contains_key(&offset)
    }

    /// Number of strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the pool holds no strings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the raw pool in bytes.
    #[inline]
    pub fn byte_len(&self) -> u32 {
        self.byte_len
    }

    /// Entries in offset order.
    #[inline]
    pub fn entries(&self) -> &[StringPoolEntry] {
        &self.entries
    }

    /// Iterate over entries in offset order.
    pub fn iter(&self) -> std::slice::Iter<'_, StringPoolEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_across_empty_string() {
        let pool = StringPool::decode(b"abc\0\0hello\0").unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(0), Some("abc"));
        assert_eq!(pool.get(4), Some(""));
        assert_eq!(pool.get(5), Some("hello"));
        assert_eq!(pool.get(1), None);
        assert_eq!(pool.byte_len(), 11);
    }

    #[test]
    fn test_offsets_count_encoded_bytes() {
        let pool = StringPool::decode("é\0ß€\0x\0".as_bytes()).unwrap();

        assert_eq!(pool.get(0), Some("é"));
        assert_eq!(pool.get(3), Some("ß€"));
        assert_eq!(pool.get(9), Some("x"));
        let offsets: Vec<_> = pool.iter().map(|e| e.byte_offset).collect();
        assert_eq!(offsets, [0, 3, 9]);
    }

    #[test]
    fn test_empty_pool() {
        let pool = StringPool::decode(&[]).unwrap();

        assert!(pool.is_empty());
        assert_eq!(pool.get(0), None);
        assert_eq!(pool.get_or_empty(0), "");
    }

    #[test]
    fn test_offset_zero_is_a_real_string() {
        let pool = StringPool::decode(b"first\0").unwrap();

        assert!(pool.contains(0));
        assert_eq!(pool.get_or_empty(0), "first");
    }

    #[test]
    fn test_unterminated_tail() {
        assert_eq!(
            StringPool::decode(b"ok\0dangling"),
            Err(PoolDefect::Unterminated { offset: 3 })
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(
            StringPool::decode(b"\0ab\xFF\0"),
            Err(PoolDefect::InvalidUtf8 { offset: 1 })
        );
    }
}
