//! GLB container demuxing and assembly.
//!
//! A container is a 12-byte header followed by a JSON chunk and a BIN chunk.
//! [`demux`] validates the envelope and records where each chunk's payload
//! lives; it never copies payload bytes. [`write_container`] is the inverse
//! and is mostly used to build fixtures.

use std::ops::Range;

use glbread_core::{ContainerError, DecoderBuffer};
use log::debug;

pub const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
pub const GLB_VERSION: u32 = 2;
pub const GLB_CHUNK_JSON: u32 = 0x4E4F534A; // "JSON"
pub const GLB_CHUNK_BIN: u32 = 0x004E4942; // "BIN\0"

pub const GLB_HEADER_LEN: usize = 12;
pub const CHUNK_HEADER_LEN: usize = 8;

/// Byte range of one chunk payload, relative to the container start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkRange {
    pub offset: usize,
    pub length: usize,
}

impl ChunkRange {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// A validated container: the input bytes plus the two chunk ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    bytes: &'a [u8],
    version: u32,
    declared_length: u32,
    json: ChunkRange,
    bin: ChunkRange,
}

impl<'a> Container<'a> {
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Total length from the header. Bytes past it are ignored.
    pub fn declared_length(&self) -> u32 {
        self.declared_length
    }

    pub fn json_range(&self) -> ChunkRange {
        self.json
    }

    pub fn bin_range(&self) -> ChunkRange {
        self.bin
    }

    /// The JSON chunk payload, including any trailing space padding.
    pub fn json(&self) -> &'a [u8] {
        self.bytes.get(self.json.range()).unwrap_or_default()
    }

    /// The BIN chunk payload, including any trailing zero padding.
    pub fn bin(&self) -> &'a [u8] {
        self.bytes.get(self.bin.range()).unwrap_or_default()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Validates a version-2 container and locates its chunks.
pub fn demux(bytes: &[u8]) -> Result<Container<'_>, ContainerError> {
    demux_with(bytes, true)
}

/// Like [`demux`], but any header version is accepted when `strict_version`
/// is false.
pub fn demux_with(bytes: &[u8], strict_version: bool) -> Result<Container<'_>, ContainerError> {
    let mut header = DecoderBuffer::new(bytes);

    let magic = header.decode_u32()?;
    if magic != GLB_MAGIC {
        return Err(ContainerError::InvalidMagic { found: magic });
    }
    let version = header.decode_u32()?;
    if strict_version && version != GLB_VERSION {
        return Err(ContainerError::UnsupportedVersion { found: version });
    }
    let declared_length = header.decode_u32()?;

    let total = declared_length as usize;
    let body = bytes.get(..total).ok_or(ContainerError::Truncated {
        offset: 0,
        needed: total,
        available: bytes.len(),
    })?;

    // Chunks are read against the declared length, not the buffer length.
    let mut buffer = DecoderBuffer::new(body);
    buffer.advance(GLB_HEADER_LEN)?;
    let json = read_chunk(&mut buffer, GLB_CHUNK_JSON)?;
    let bin = read_chunk(&mut buffer, GLB_CHUNK_BIN)?;

    debug!(
        "container v{}: {} bytes, JSON at {}..{}, BIN at {}..{}",
        version,
        total,
        json.offset,
        json.end(),
        bin.offset,
        bin.end()
    );

    Ok(Container {
        bytes,
        version,
        declared_length,
        json,
        bin,
    })
}

fn read_chunk(buffer: &mut DecoderBuffer<'_>, expected: u32) -> Result<ChunkRange, ContainerError> {
    let header_offset = buffer.position();
    let length = buffer.decode_u32()? as usize;
    let found = buffer.decode_u32()?;
    if found != expected {
        return Err(ContainerError::UnexpectedChunkType {
            offset: header_offset,
            expected,
            found,
        });
    }

    let offset = buffer.position();
    buffer.advance(length)?;
    Ok(ChunkRange { offset, length })
}

/// Assembles a version-2 container from a JSON document and a binary blob.
///
/// JSON is padded with spaces and BIN with zeros to 4-byte alignment. The
/// BIN chunk is always written, even when `bin` is empty.
pub fn write_container(json: &[u8], bin: &[u8]) -> Vec<u8> {
    let json_padding = (4 - (json.len() % 4)) % 4;
    let padded_json_len = json.len() + json_padding;

    let bin_padding = (4 - (bin.len() % 4)) % 4;
    let padded_bin_len = bin.len() + bin_padding;

    let total_len = GLB_HEADER_LEN + CHUNK_HEADER_LEN + padded_json_len + CHUNK_HEADER_LEN + padded_bin_len;

    let mut output = Vec::with_capacity(total_len);

    // Header
    output.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    output.extend_from_slice(&GLB_VERSION.to_le_bytes());
    output.extend_from_slice(&(total_len as u32).to_le_bytes());

    // JSON chunk
    output.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    output.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    output.extend_from_slice(json);
    output.resize(output.len() + json_padding, b' ');

    // Binary chunk
    output.extend_from_slice(&(padded_bin_len as u32).to_le_bytes());
    output.extend_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
    output.extend_from_slice(bin);
    output.resize(output.len() + bin_padding, 0);

    output
}
