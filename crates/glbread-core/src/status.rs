//! Error types shared by every glbread stage.
//!
//! A load reports exactly one [`GlbError`]. Its [`GlbError::stage`] names the
//! step that failed and [`GlbError::offset`] the offending byte, when known.
//! Offsets inside the JSON segment are relative to the segment start; offsets
//! in [`ContainerError`] are relative to the container start.

use std::fmt;

use thiserror::Error;

use crate::token::TokenKind;

/// Failures while validating the binary envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("invalid magic 0x{found:08X}, expected 0x46546C67 (\"glTF\")")]
    InvalidMagic { found: u32 },
    #[error("unsupported container version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("unexpected chunk type 0x{found:08X} at byte {offset}, expected 0x{expected:08X}")]
    UnexpectedChunkType {
        offset: usize,
        expected: u32,
        found: u32,
    },
    #[error("truncated container: need {needed} bytes at byte {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// The document is well-formed JSON but does not describe a usable scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("document root is not an object")]
    RootNotObject,
    #[error("expected {expected} at byte {offset}, found {found}")]
    UnexpectedKind {
        offset: usize,
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("document declares no buffer")]
    MissingBuffer,
    #[error("document declares {count} buffers, exactly one is supported")]
    MultipleBuffers { count: usize },
    #[error("primitive at byte {offset} has no POSITION attribute")]
    MissingPosition { offset: usize },
    #[error("{what} index {index} is out of range ({len} available)")]
    IndexOutOfRange {
        what: &'static str,
        index: u32,
        len: usize,
    },
    #[error("{what} covers bytes {start}..{end} but only {len} are available")]
    RangeOutOfBounds {
        what: &'static str,
        start: u64,
        end: u64,
        len: u64,
    },
    #[error("accessor {index} cannot be staged: {reason}")]
    UnsupportedLayout { index: u32, reason: &'static str },
}

/// Umbrella error returned by every public entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlbError {
    #[error("container format error: {0}")]
    Container(#[from] ContainerError),
    /// Raised by the tokenizer, or by the cursor when the token stream ends
    /// early during extraction; `stage` tells which.
    #[error("JSON syntax error at byte {offset}: {reason}")]
    JsonSyntax {
        offset: usize,
        reason: &'static str,
        stage: Stage,
    },
    #[error("unsupported value at byte {offset}: {reason}")]
    UnsupportedValue { offset: usize, reason: &'static str },
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Pipeline step an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Demux,
    Tokenize,
    Extract,
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Demux => "demux",
            Stage::Tokenize => "tokenize",
            Stage::Extract => "extract",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl GlbError {
    pub(crate) fn syntax(offset: usize, reason: &'static str) -> Self {
        GlbError::JsonSyntax {
            offset,
            reason,
            stage: Stage::Tokenize,
        }
    }

    /// A malformed token stream found while walking it.
    pub fn overrun(offset: usize, reason: &'static str) -> Self {
        GlbError::JsonSyntax {
            offset,
            reason,
            stage: Stage::Extract,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            GlbError::Container(_) => Stage::Demux,
            GlbError::JsonSyntax { stage, .. } => *stage,
            GlbError::UnsupportedValue { .. } | GlbError::Schema(_) => Stage::Extract,
        }
    }

    /// Byte offset of the failure, if the error carries one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            GlbError::Container(ContainerError::UnexpectedChunkType { offset, .. })
            | GlbError::Container(ContainerError::Truncated { offset, .. }) => Some(*offset),
            GlbError::Container(_) => Some(0),
            GlbError::JsonSyntax { offset, .. } | GlbError::UnsupportedValue { offset, .. } => {
                Some(*offset)
            }
            GlbError::Schema(SchemaError::UnexpectedKind { offset, .. })
            | GlbError::Schema(SchemaError::MissingPosition { offset }) => Some(*offset),
            GlbError::Schema(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GlbError>;
