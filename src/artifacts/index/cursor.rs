//! Bounds-checked reader over the index entry region
//!
//! Every read checks the remaining length first and reports a
//! `TruncatedIndex` error instead of slicing past the end.

use crate::errors::{Error, Result};
use byteorder::{ByteOrder, NetworkEndian};

#[derive(Debug)]
pub struct Cursor<'b> {
    bytes: &'b [u8],
    offset: usize,
    /// Absolute file offset of `bytes[0]`, for error reporting
    base: usize,
}

impl<'b> Cursor<'b> {
    pub fn new(bytes: &'b [u8], base: usize) -> Self {
        Cursor {
            bytes,
            offset: 0,
            base,
        }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn take(&mut self, size: usize) -> Result<&'b [u8]> {
        if self.remaining() < size {
            return Err(Error::TruncatedIndex {
                offset: self.base + self.offset,
                needed: size,
                available: self.remaining(),
            });
        }

        let chunk = &self.bytes[self.offset..self.offset + size];
        self.offset += size;
        Ok(chunk)
    }

    pub fn skip(&mut self, size: usize) -> Result<()> {
        self.take(size).map(|_| ())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.take(4).map(NetworkEndian::read_u32)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.take(2).map(NetworkEndian::read_u16)
    }
}
