//! Bounds-checked cursor over an in-memory byte buffer.

use crate::error::{IoError, IoResult};

pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move to an absolute offset, clamped to the end of the buffer.
    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    pub(crate) fn read_bytes(&mut self, count: usize) -> IoResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(IoError::UnexpectedEof { position: self.pos })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> IoResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_tag(&mut self) -> IoResult<[u8; 4]> {
        self.read_array()
    }

    pub(crate) fn read_u16_le(&mut self) -> IoResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub(crate) fn read_u32_le(&mut self) -> IoResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub(crate) fn read_f32_le(&mut self) -> IoResult<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    pub(crate) fn read_u16_be(&mut self) -> IoResult<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub(crate) fn read_u32_be(&mut self) -> IoResult<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub(crate) fn read_f32_be(&mut self) -> IoResult<f32> {
        self.read_array().map(f32::from_be_bytes)
    }

    /// Bytes up to (not including) the next NUL; the NUL is consumed.
    pub(crate) fn read_cstr(&mut self) -> IoResult<&'a [u8]> {
        let rest = &self.data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(IoError::UnexpectedEof {
                position: self.data.len(),
            })?;
        let bytes = &rest[..len];
        self.pos += len + 1;
        Ok(bytes)
    }
}
