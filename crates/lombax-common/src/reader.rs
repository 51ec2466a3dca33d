//! Binary reader for bounds-checked parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! fixed-width values from a byte slice in either byte order. Engine
//! containers address everything by absolute offset, so the reader can be
//! positioned anywhere in the source and every read is checked against the
//! source length.

use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Reader over big-endian data (the engine container byte order).
pub type BeReader<'a> = BinaryReader<'a, BigEndian>;

/// Reader over little-endian data.
pub type LeReader<'a> = BinaryReader<'a, LittleEndian>;

/// A binary reader over a byte slice.
///
/// The byte order is part of the type, so a reader never mixes orders.
///
/// # Example
///
/// ```
/// use lombax_common::BeReader;
///
/// let data = [0x00, 0x00, 0x01, 0x00, 0x3F, 0x80, 0x00, 0x00];
/// let mut reader = BeReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x100);
/// assert_eq!(reader.read_f32().unwrap(), 1.0);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a, E = BigEndian> {
    data: &'a [u8],
    position: usize,
    _order: PhantomData<E>,
}

impl<'a, E: ByteOrder> BinaryReader<'a, E> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self::new_at(data, 0)
    }

    /// Create a new reader starting at an absolute position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position,
            _order: PhantomData,
        }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Advance the position by a number of bytes.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Borrow an absolute block without moving the cursor.
    pub fn block(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(Error::OutOfBounds {
            offset,
            len,
            size: self.data.len(),
        })?;
        self.data.get(offset..end).ok_or(Error::OutOfBounds {
            offset,
            len,
            size: self.data.len(),
        })
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bytes(2).map(E::read_u16)
    }

    /// Read an i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_bytes(2).map(E::read_i16)
    }

    /// Read a u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(E::read_u32)
    }

    /// Read an i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_bytes(4).map(E::read_i32)
    }

    /// Read an f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_bytes(4).map(E::read_f32)
    }

    /// Read `N` consecutive f32 values.
    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let bytes = self.read_bytes(N * 4)?;
        let mut out = [0.0f32; N];
        E::read_f32_into(bytes, &mut out);
        Ok(out)
    }

    /// Read `count` consecutive u16 values.
    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>> {
        let bytes = self.read_bytes(count.saturating_mul(2))?;
        let mut out = vec![0u16; count];
        E::read_u16_into(bytes, &mut out);
        Ok(out)
    }

    /// Read a u16 at an absolute offset without moving the cursor.
    #[inline]
    pub fn u16_at(&self, offset: usize) -> Result<u16> {
        self.block(offset, 2).map(E::read_u16)
    }

    /// Read a u32 at an absolute offset without moving the cursor.
    #[inline]
    pub fn u32_at(&self, offset: usize) -> Result<u32> {
        self.block(offset, 4).map(E::read_u32)
    }

    /// Read an i32 at an absolute offset without moving the cursor.
    #[inline]
    pub fn i32_at(&self, offset: usize) -> Result<i32> {
        self.block(offset, 4).map(E::read_i32)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate. Byte
    /// order is the struct's business: use zerocopy's endian-aware field types.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Borrow `count` consecutive records in place and advance past them.
    ///
    /// The bytes are bounds-checked before anything is allocated, so an
    /// untrusted count can't trigger a huge allocation.
    pub fn read_slice<T>(&mut self, count: usize) -> Result<&'a [T]>
    where
        T: FromBytes + Immutable + KnownLayout + Unaligned,
    {
        let needed = count.saturating_mul(std::mem::size_of::<T>());
        let bytes = self.read_bytes(needed)?;
        <[T]>::ref_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed,
            available: bytes.len(),
        })
    }

    /// Peek at a u32 without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        self.peek_bytes(4).map(E::read_u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x01020304
            0xFF, 0xFE, // i16: -2
        ];
        let mut reader = BeReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x01020304);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_little_endian() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let mut reader = LeReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BeReader::new(&data);

        assert_eq!(reader.peek_u32().unwrap(), 0x01020304);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u32().unwrap(), 0x01020304);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_absolute_reads() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A];
        let reader = BeReader::new(&data);

        assert_eq!(reader.u32_at(4).unwrap(), 42);
        assert_eq!(reader.u16_at(6).unwrap(), 42);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BeReader::new(&data);

        assert!(reader.read_u32().is_err());
    }

    #[test]
    fn test_block_out_of_bounds() {
        let data = [0u8; 16];
        let reader = BeReader::new(&data);

        assert!(reader.block(8, 8).is_ok());
        assert!(matches!(
            reader.block(12, 8),
            Err(Error::OutOfBounds { offset: 12, len: 8, size: 16 })
        ));
        assert!(reader.block(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_read_slice() {
        use zerocopy::byteorder::big_endian::U16;

        let data = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let mut reader = BeReader::new(&data);

        let values = reader.read_slice::<U16>(2).unwrap();
        assert_eq!(values.iter().map(|v| v.get()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(reader.position(), 4);
        assert!(reader.read_slice::<U16>(usize::MAX).is_err());
    }

    #[test]
    fn test_read_arrays() {
        let data = [0x3F, 0x80, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x07];
        let mut reader = BeReader::new(&data);

        assert_eq!(reader.read_f32_array::<2>().unwrap(), [1.0, 2.0]);
        assert_eq!(reader.read_u16_vec(1).unwrap(), vec![7]);
    }
}
