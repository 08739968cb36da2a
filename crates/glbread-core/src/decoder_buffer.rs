use byteorder::{ByteOrder, LittleEndian};

use crate::status::ContainerError;

/// Bounds-checked little-endian reader over a resident byte buffer.
///
/// Every read that would land outside the buffer fails with
/// [`ContainerError::Truncated`] and leaves the position unchanged.
///
/// # Example
///
/// ```
/// use glbread_core::DecoderBuffer;
///
/// let data = [0x67, 0x6C, 0x54, 0x46, 0x02];
/// let mut buffer = DecoderBuffer::new(&data);
///
/// assert_eq!(buffer.decode_u32().unwrap(), 0x46546C67);
/// assert_eq!(buffer.remaining_size(), 1);
/// assert!(buffer.decode_u32().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining in the buffer.
    pub fn remaining_size(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn truncated(&self, needed: usize) -> ContainerError {
        ContainerError::Truncated {
            offset: self.pos,
            needed,
            available: self.remaining_size(),
        }
    }

    /// Decodes a little-endian u32.
    pub fn decode_u32(&mut self) -> Result<u32, ContainerError> {
        let bytes = self.decode_slice(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Decodes and returns a slice of the specified size.
    pub fn decode_slice(&mut self, size: usize) -> Result<&'a [u8], ContainerError> {
        let end = self
            .pos
            .checked_add(size)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.truncated(size))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Advances the position by `n` bytes without reading.
    pub fn advance(&mut self, n: usize) -> Result<(), ContainerError> {
        self.decode_slice(n).map(|_| ())
    }
}
