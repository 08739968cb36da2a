//! glbread core library
//!
//! Format-agnostic building blocks for reading GLB containers: a bounds-checked
//! little-endian byte reader, the two-pass JSON token scanner, the token
//! cursor with its general subtree skip, decimal integer conversion, the
//! closed glTF enums, and the error types every stage reports through.

pub mod cursor;
pub mod data_types;
pub mod decoder_buffer;
pub mod integer;
pub mod status;
pub mod token;
pub mod tokenizer;

pub use cursor::TokenCursor;
pub use data_types::{BufferViewTarget, ComponentType, ElementType, PrimitiveMode};
pub use decoder_buffer::DecoderBuffer;
pub use integer::{convert_integer, IntegerError};
pub use status::{ContainerError, GlbError, Result, SchemaError, Stage};
pub use token::{Token, TokenKind};
pub use tokenizer::{count_tokens, tokenize, tokenize_into, TokenSink};
