use nom::{
    bytes::complete::take,
    error::Error as NomError,
    number::complete::{be_i16, be_u16, be_u32, be_u64},
    Parser,
};

use crate::Result;

/// One block of input as delivered by the caller, with the file offset of its
/// first byte.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    data: &'a [u8],
    offset: u64,
}

impl<'a> Block<'a> {
    pub fn new(data: &'a [u8], offset: u64) -> Self {
        Self { data, offset }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read position inside the current block.
#[derive(Debug)]
pub(crate) struct Window<'a> {
    block: Block<'a>,
    pos: usize,
}

impl<'a> Window<'a> {
    pub fn new(block: Block<'a>) -> Self {
        Self { block, pos: 0 }
    }

    /// Bytes not yet consumed in this block.
    pub fn remaining(&self) -> usize {
        self.block.len() - self.pos
    }

    /// Bytes consumed from this block so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// File offset of the next unread byte.
    pub fn file_offset(&self) -> u64 {
        self.block.offset + self.pos as u64
    }

    /// Returns the next `len` bytes without consuming them, `None` if the
    /// block ends earlier.
    pub fn peek(&self, len: usize) -> Option<&'a [u8]> {
        self.block.data.get(self.pos..self.pos + len)
    }

    /// Consume `len` bytes, caller ensures they are there.
    pub fn advance(&mut self, len: usize) -> &'a [u8] {
        debug_assert!(len <= self.remaining());
        let r = &self.block.data[self.pos..self.pos + len];
        self.pos += len;
        r
    }
}

/// Sequential big-endian reader over the interpreted part of a segment,
/// tracking the offset of each field relative to the segment start.
pub(crate) struct FieldReader<'a> {
    buf: &'a [u8],
    base: usize,
    len: usize,
}

impl<'a> FieldReader<'a> {
    /// `base` is the offset of `buf[0]` relative to the segment start.
    pub fn new(buf: &'a [u8], base: usize) -> Self {
        Self {
            buf,
            base,
            len: buf.len(),
        }
    }

    /// Offset of the next field relative to the segment start.
    pub fn offset(&self) -> usize {
        self.base + self.len - self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn read<O>(&mut self, mut p: impl Parser<&'a [u8], O, NomError<&'a [u8]>>) -> Result<O> {
        let (buf, r) = p.parse(self.buf)?;
        self.buf = buf;
        Ok(r)
    }

    pub fn u16(&mut self) -> Result<u16> {
        self.read(be_u16)
    }

    pub fn i16(&mut self) -> Result<i16> {
        self.read(be_i16)
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.read(be_u32)
    }

    pub fn u64(&mut self) -> Result<u64> {
        self.read(be_u64)
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.read(take(n))
    }
}

#[cfg(test)]
mod tests;
