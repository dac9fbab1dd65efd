//! Sequential binary cursor over a byte stream.
//!
//! This module provides [`StreamReader`], a cursor-like type that reads
//! little-endian primitives from any `Read + Seek` source while tracking the
//! stream position and the number of bytes left.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A [`StreamReader`] over a buffered file handle.
pub type FileReader = StreamReader<BufReader<File>>;

/// A sequential reader over a seekable byte stream.
///
/// The stream length is captured once on construction so every read can be
/// bounds-checked up front: a read that would run past the end fails with
/// [`Error::TruncatedInput`] without consuming anything.
///
/// The reader owns its source. For [`FileReader`] the file handle is closed
/// when the reader is dropped.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use dbcore_common::StreamReader;
///
/// let data = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = StreamReader::new(Cursor::new(data))?;
///
/// assert_eq!(reader.read_u32()?, 0x04030201);
/// assert_eq!(reader.read_u32()?, 0x08070605);
/// assert!(reader.is_empty());
/// # Ok::<(), dbcore_common::Error>(())
/// ```
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    position: u64,
    len: u64,
}

impl FileReader {
    /// Open a file for sequential reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            inner: BufReader::new(file),
            position: 0,
            len,
        })
    }
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap a seekable source, starting at its current position.
    pub fn new(mut inner: R) -> Result<Self> {
        let position = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;
        Ok(Self { inner, position, len })
    }

    /// Get the current position in the stream.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get the total length of the underlying stream.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position >= self.len
    }

    /// Fail with [`Error::TruncatedInput`] unless `needed` bytes remain.
    #[inline]
    pub fn ensure(&self, needed: u64) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::TruncatedInput {
                needed,
                available: self.remaining(),
                position: self.position,
            });
        }
        Ok(())
    }

    /// Seek to an absolute position.
    ///
    /// Seeking to the end of the stream is allowed; seeking past it is not.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.len {
            return Err(Error::TruncatedInput {
                needed: position.saturating_sub(self.position),
                available: self.remaining(),
                position: self.position,
            });
        }
        self.inner.seek(SeekFrom::Start(position))?;
        self.position = position;
        Ok(())
    }

    /// Advance the position by a number of bytes.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.ensure(count)?;
        self.seek(self.position + count)
    }

    /// Read bytes and advance the position.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure(count as u64)?;
        let mut bytes = vec![0u8; count];
        self.inner.read_exact(&mut bytes)?;
        self.position += count as u64;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let value = self.inner.read_u8()?;
        self.position += 1;
        Ok(value)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let value = self.inner.read_u32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        let value = self.inner.read_i32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        let value = self.inner.read_f32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian f64.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        let value = self.inner.read_f64::<LittleEndian>()?;
        self.position += 8;
        Ok(value)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate. Field
    /// byte order is whatever the struct's field types declare.
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(&bytes).map_err(|_| Error::TruncatedInput {
            needed: size as u64,
            available: bytes.len() as u64,
            position: self.position,
        })
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
