//! Parse entry points.
//!
//! ```
//! use glbread_io::{parse_glb, write_container};
//!
//! let json = br#"{"buffers":[{"byteLength":4}],"asset":{"version":"2.0"}}"#;
//! let glb = write_container(json, &[0; 4]);
//!
//! let parsed = parse_glb(&glb).unwrap();
//! assert_eq!(parsed.document.buffer.byte_length, 4);
//! assert_eq!(parsed.bin().len(), 4);
//! ```

use glbread_core::{tokenize_into, Result, Token};
use log::debug;

use crate::container::{demux_with, Container};
use crate::document::SceneDocument;
use crate::options::ParseOptions;
use crate::schema::parse_document;
use crate::validate::{validate_buffer, validate_references};

/// A parsed container: the chunk layout plus the extracted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGlb<'a> {
    pub container: Container<'a>,
    pub document: SceneDocument,
    /// Tokens in the JSON chunk.
    pub token_count: usize,
}

impl<'a> ParsedGlb<'a> {
    /// The BIN chunk, for resolving accessors into vertex and index bytes.
    pub fn bin(&self) -> &'a [u8] {
        self.container.bin()
    }
}

/// Parses GLB containers with fixed options, reusing one token buffer.
///
/// The token buffer keeps its capacity between parses and is cleared after
/// each one, so no parse output refers to it.
#[derive(Debug, Default)]
pub struct SceneParser {
    options: ParseOptions,
    tokens: Vec<Token>,
}

impl SceneParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            tokens: Vec::new(),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Capacity retained from earlier parses.
    pub fn token_capacity(&self) -> usize {
        self.tokens.capacity()
    }

    /// Demuxes, tokenizes, extracts and (optionally) validates one container.
    pub fn parse<'a>(&mut self, bytes: &'a [u8]) -> Result<ParsedGlb<'a>> {
        let container = demux_with(bytes, self.options.strict_version)?;
        let (document, token_count) = self.scan(container.json())?;
        if self.options.validate_references {
            validate_buffer(&document, container.bin_range().length)?;
        }
        Ok(ParsedGlb {
            container,
            document,
            token_count,
        })
    }

    /// Tokenizes and extracts a bare JSON document.
    pub fn parse_json(&mut self, json: &[u8]) -> Result<SceneDocument> {
        self.scan(json).map(|(document, _)| document)
    }

    fn scan(&mut self, json: &[u8]) -> Result<(SceneDocument, usize)> {
        let result = self.extract(json);
        self.tokens.clear();
        result
    }

    fn extract(&mut self, json: &[u8]) -> Result<(SceneDocument, usize)> {
        let token_count = tokenize_into(json, &mut self.tokens, self.options.max_tokens)?;
        let document = parse_document(&self.tokens, json)?;
        if self.options.validate_references {
            validate_references(&document)?;
            debug!("cross references validated");
        }
        Ok((document, token_count))
    }
}

/// Parses `bytes` with default options and a fresh token buffer.
pub fn parse_glb(bytes: &[u8]) -> Result<ParsedGlb<'_>> {
    SceneParser::new().parse(bytes)
}
