//! Two-pass JSON token scanner.
//!
//! The same scanner traversal runs twice: once with a [`TokenCounter`]
//! that only counts, then with a [`TokenWriter`] over storage pre-sized to
//! exactly that count. Both passes see the same bytes through the same code,
//! so they either agree on every token or fail at the same byte.
//!
//! ```
//! use glbread_core::tokenizer::{count_tokens, tokenize};
//! use glbread_core::TokenKind;
//!
//! let json = br#"{"scene":0,"nodes":[{"mesh":0}]}"#;
//! let tokens = tokenize(json).unwrap();
//! assert_eq!(tokens.len(), count_tokens(json).unwrap());
//! assert_eq!(tokens[0].kind, TokenKind::Object);
//! assert_eq!(tokens[0].size, 2);
//! ```

use log::debug;
use memchr::memchr2;

use crate::status::{GlbError, Result};
use crate::token::{Token, TokenKind};

/// Receives tokens in pre-order as the scanner produces them.
pub trait TokenSink {
    /// Records the token at `index`. Containers arrive with `end` equal to
    /// `start` and a `size` of 0; [`TokenSink::close`] completes them.
    fn emit(&mut self, index: usize, token: Token) -> Result<()>;

    /// Completes the container at `index` once its closing bracket is read.
    fn close(&mut self, index: usize, end: u32, size: u32) -> Result<()>;
}

/// Counting pass: stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenCounter;

impl TokenSink for TokenCounter {
    fn emit(&mut self, _index: usize, _token: Token) -> Result<()> {
        Ok(())
    }

    fn close(&mut self, _index: usize, _end: u32, _size: u32) -> Result<()> {
        Ok(())
    }
}

/// Fill pass: writes into a slice sized by the counting pass.
#[derive(Debug)]
pub struct TokenWriter<'t> {
    tokens: &'t mut [Token],
    written: usize,
}

impl<'t> TokenWriter<'t> {
    pub fn new(tokens: &'t mut [Token]) -> Self {
        Self { tokens, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl TokenSink for TokenWriter<'_> {
    fn emit(&mut self, index: usize, token: Token) -> Result<()> {
        let slot = self.tokens.get_mut(index).ok_or_else(|| {
            GlbError::syntax(token.start as usize, "token count changed between passes")
        })?;
        *slot = token;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self, index: usize, end: u32, size: u32) -> Result<()> {
        let slot = self.tokens.get_mut(index).ok_or_else(|| {
            GlbError::syntax(end as usize, "token count changed between passes")
        })?;
        slot.end = end;
        slot.size = size;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    KeyOrClose,
    Key,
    Colon,
    Value,
    ValueOrClose,
    CommaOrClose,
}

#[derive(Debug)]
struct Frame {
    kind: TokenKind,
    index: usize,
    children: u32,
    expect: Expect,
}

struct Scanner<'j> {
    json: &'j [u8],
    pos: usize,
    count: usize,
    stack: Vec<Frame>,
    root_done: bool,
}

impl<'j> Scanner<'j> {
    fn new(json: &'j [u8]) -> Result<Self> {
        if json.len() > u32::MAX as usize {
            return Err(GlbError::syntax(0, "document exceeds 4 GiB"));
        }
        Ok(Self {
            json,
            pos: 0,
            count: 0,
            stack: Vec::new(),
            root_done: false,
        })
    }

    fn run<S: TokenSink>(mut self, sink: &mut S) -> Result<usize> {
        loop {
            self.skip_whitespace();
            let Some(&byte) = self.json.get(self.pos) else {
                break;
            };
            if self.root_done {
                return Err(GlbError::syntax(self.pos, "unexpected data after document"));
            }
            match byte {
                b'{' | b'[' => self.open(byte, sink)?,
                b'}' | b']' => self.close(byte, sink)?,
                b'"' => self.string(sink)?,
                b':' => self.colon()?,
                b',' => self.comma()?,
                _ => self.primitive(sink)?,
            }
        }

        if let Some(frame) = self.stack.last() {
            let reason = match frame.kind {
                TokenKind::Object => "unterminated object",
                _ => "unterminated array",
            };
            return Err(GlbError::syntax(self.json.len(), reason));
        }
        if !self.root_done {
            return Err(GlbError::syntax(self.pos, "empty document"));
        }
        Ok(self.count)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.json.get(self.pos).copied() {
            self.pos += 1;
        }
    }

    fn next_index(&mut self) -> usize {
        let index = self.count;
        self.count += 1;
        index
    }

    fn finish_scalar(&mut self) {
        if self.stack.is_empty() {
            self.root_done = true;
        }
    }

    /// Accounts for a value about to start at the current position.
    fn begin_value(&mut self) -> Result<()> {
        let at = self.pos;
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        match frame.expect {
            Expect::Value | Expect::ValueOrClose => {
                if frame.kind == TokenKind::Array {
                    frame.children += 1;
                }
                frame.expect = Expect::CommaOrClose;
                Ok(())
            }
            Expect::KeyOrClose | Expect::Key => Err(GlbError::syntax(at, "expected object key")),
            Expect::Colon => Err(GlbError::syntax(at, "expected ':'")),
            Expect::CommaOrClose => Err(GlbError::syntax(at, "expected ',' or closing bracket")),
        }
    }

    fn open<S: TokenSink>(&mut self, byte: u8, sink: &mut S) -> Result<()> {
        self.begin_value()?;
        let (kind, expect) = if byte == b'{' {
            (TokenKind::Object, Expect::KeyOrClose)
        } else {
            (TokenKind::Array, Expect::ValueOrClose)
        };
        let start = self.pos as u32;
        let index = self.next_index();
        sink.emit(index, Token::new(kind, start, start, 0))?;
        self.stack.push(Frame {
            kind,
            index,
            children: 0,
            expect,
        });
        self.pos += 1;
        Ok(())
    }

    fn close<S: TokenSink>(&mut self, byte: u8, sink: &mut S) -> Result<()> {
        let kind = if byte == b'}' {
            TokenKind::Object
        } else {
            TokenKind::Array
        };
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| GlbError::syntax(self.pos, "unmatched closing bracket"))?;
        if frame.kind != kind {
            return Err(GlbError::syntax(self.pos, "mismatched closing bracket"));
        }
        if !matches!(
            frame.expect,
            Expect::KeyOrClose | Expect::ValueOrClose | Expect::CommaOrClose
        ) {
            return Err(GlbError::syntax(self.pos, "unexpected closing bracket"));
        }
        self.pos += 1;
        sink.close(frame.index, self.pos as u32, frame.children)?;
        if self.stack.is_empty() {
            self.root_done = true;
        }
        Ok(())
    }

    fn string<S: TokenSink>(&mut self, sink: &mut S) -> Result<()> {
        let is_key = match self.stack.last_mut() {
            Some(frame) if matches!(frame.expect, Expect::KeyOrClose | Expect::Key) => {
                frame.children += 1;
                frame.expect = Expect::Colon;
                true
            }
            _ => {
                self.begin_value()?;
                false
            }
        };
        let (start, end) = self.scan_string()?;
        let index = self.next_index();
        sink.emit(
            index,
            Token::new(TokenKind::String, start as u32, end as u32, u32::from(is_key)),
        )?;
        self.finish_scalar();
        Ok(())
    }

    /// Scans from an opening quote; returns the content range and leaves the
    /// position after the closing quote.
    fn scan_string(&mut self) -> Result<(usize, usize)> {
        let quote = self.pos;
        let start = quote + 1;
        let mut at = start;
        loop {
            let found = self
                .json
                .get(at..)
                .and_then(|rest| memchr2(b'"', b'\\', rest))
                .ok_or_else(|| GlbError::syntax(quote, "unterminated string"))?;
            at += found;
            if self.json[at] == b'"' {
                self.pos = at + 1;
                return Ok((start, at));
            }
            match self.json.get(at + 1).copied() {
                Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => at += 2,
                Some(b'u') => {
                    let hex = self
                        .json
                        .get(at + 2..at + 6)
                        .ok_or_else(|| GlbError::syntax(quote, "unterminated string"))?;
                    if !hex.iter().all(u8::is_ascii_hexdigit) {
                        return Err(GlbError::syntax(at, "invalid unicode escape"));
                    }
                    at += 6;
                }
                Some(_) => return Err(GlbError::syntax(at, "invalid escape sequence")),
                None => return Err(GlbError::syntax(quote, "unterminated string")),
            }
        }
    }

    fn colon(&mut self) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) if frame.expect == Expect::Colon => {
                frame.expect = Expect::Value;
                self.pos += 1;
                Ok(())
            }
            _ => Err(GlbError::syntax(self.pos, "unexpected ':'")),
        }
    }

    fn comma(&mut self) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) if frame.expect == Expect::CommaOrClose => {
                frame.expect = if frame.kind == TokenKind::Object {
                    Expect::Key
                } else {
                    Expect::Value
                };
                self.pos += 1;
                Ok(())
            }
            _ => Err(GlbError::syntax(self.pos, "unexpected ','")),
        }
    }

    fn primitive<S: TokenSink>(&mut self, sink: &mut S) -> Result<()> {
        let start = self.pos;
        let first = self.json[start];
        if !(first == b'-' || first.is_ascii_digit() || matches!(first, b't' | b'f' | b'n')) {
            return Err(GlbError::syntax(start, "unexpected character"));
        }
        self.begin_value()?;
        let len = self.json[start..]
            .iter()
            .position(|&b| !(b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')))
            .unwrap_or(self.json.len() - start);
        let end = start + len;
        if !is_valid_literal(&self.json[start..end]) {
            return Err(GlbError::syntax(start, "invalid literal"));
        }
        let index = self.next_index();
        sink.emit(
            index,
            Token::new(TokenKind::Primitive, start as u32, end as u32, 0),
        )?;
        self.pos = end;
        self.finish_scalar();
        Ok(())
    }
}

fn is_valid_literal(literal: &[u8]) -> bool {
    match literal {
        b"true" | b"false" | b"null" => true,
        [first, ..] if *first == b'-' || first.is_ascii_digit() => literal
            .iter()
            .all(|&b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')),
        _ => false,
    }
}

/// Runs the scanner over `json`, feeding `sink`. Returns the token count.
pub fn scan_into<S: TokenSink>(json: &[u8], sink: &mut S) -> Result<usize> {
    Scanner::new(json)?.run(sink)
}

/// Counting pass only.
pub fn count_tokens(json: &[u8]) -> Result<usize> {
    scan_into(json, &mut TokenCounter)
}

/// Tokenizes `json` into `tokens`, reusing its capacity.
///
/// `tokens` is resized exactly once, to the count from the counting pass.
/// On error it is left empty.
pub fn tokenize_into(json: &[u8], tokens: &mut Vec<Token>, max_tokens: Option<usize>) -> Result<usize> {
    tokens.clear();
    let result = fill(json, tokens, max_tokens);
    if result.is_err() {
        tokens.clear();
    }
    result
}

fn fill(json: &[u8], tokens: &mut Vec<Token>, max_tokens: Option<usize>) -> Result<usize> {
    let count = count_tokens(json)?;
    if let Some(limit) = max_tokens {
        if count > limit {
            return Err(GlbError::syntax(0, "document exceeds the token limit"));
        }
    }

    tokens.resize(count, Token::default());
    let mut writer = TokenWriter::new(tokens.as_mut_slice());
    let filled = scan_into(json, &mut writer)?;
    if filled != count || writer.written() != count {
        return Err(GlbError::syntax(json.len(), "token count changed between passes"));
    }

    debug!("tokenized {} JSON bytes into {} tokens", json.len(), count);
    Ok(count)
}

/// Tokenizes `json` into a freshly allocated token array.
pub fn tokenize(json: &[u8]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    tokenize_into(json, &mut tokens, None)?;
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_offset(json: &[u8]) -> usize {
        match tokenize(json) {
            Err(GlbError::JsonSyntax { offset, .. }) => offset,
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_preorder_layout() {
        let json = br#"{"a":[1,2],"b":{"c":"d"}}"#;
        let tokens = tokenize(json).unwrap();
        let expected = [
            Token::new(TokenKind::Object, 0, 25, 2),
            Token::new(TokenKind::String, 2, 3, 1),
            Token::new(TokenKind::Array, 5, 10, 2),
            Token::new(TokenKind::Primitive, 6, 7, 0),
            Token::new(TokenKind::Primitive, 8, 9, 0),
            Token::new(TokenKind::String, 12, 13, 1),
            Token::new(TokenKind::Object, 15, 24, 1),
            Token::new(TokenKind::String, 17, 18, 1),
            Token::new(TokenKind::String, 21, 22, 0),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_count_matches_fill() {
        let json = br#" { "asset" : { "version" : "2.0" } , "scene" : 0 ,
            "nodes" : [ { "mesh" : 0 , "rotation" : [0, 0.5, -1e3, 1] } ] } "#;
        let count = count_tokens(json).unwrap();
        let tokens = tokenize(json).unwrap();
        assert_eq!(count, tokens.len());
        assert_eq!(count, 18);
    }

    #[test]
    fn test_empty_containers() {
        let tokens = tokenize(b"{\"a\":[],\"b\":{}}").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[2].kind, TokenKind::Array);
        assert_eq!(tokens[2].size, 0);
        assert_eq!(tokens[4].kind, TokenKind::Object);
        assert_eq!(tokens[4].size, 0);
    }

    #[test]
    fn test_string_escapes() {
        let json = r#"["a\"b", "\\", "éx"]"#.as_bytes();
        let tokens = tokenize(json).unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].bytes(json), Some(&br#"a\"b"#[..]));
        assert_eq!(tokens[2].bytes(json), Some(&br"\\"[..]));
        assert_eq!(tokens[3].bytes(json), Some("éx".as_bytes()));
    }

    #[test]
    fn test_scalar_root() {
        let tokens = tokenize(b"  42 ").unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Primitive, 2, 4, 0)]);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(syntax_offset(b""), 0);
        assert_eq!(syntax_offset(b"   "), 3);
        assert_eq!(syntax_offset(br#"{"a":1"#), 6);
        assert_eq!(syntax_offset(br#"{"a" 1}"#), 5);
        assert_eq!(syntax_offset(b"[1,]"), 3);
        assert_eq!(syntax_offset(br#"{"a":"b}"#), 5);
        assert_eq!(syntax_offset(b"{} {}"), 3);
        assert_eq!(syntax_offset(b"[1}"), 2);
        assert_eq!(syntax_offset(br#"{"a":tru}"#), 5);
        assert_eq!(syntax_offset(br#"["\x"]"#), 2);
        assert_eq!(syntax_offset(br#"["\u12G4"]"#), 2);
        assert_eq!(syntax_offset(b"]"), 0);
        assert_eq!(syntax_offset(br#"{1:2}"#), 1);
        assert_eq!(syntax_offset(br#"{"a":1 "b":2}"#), 7);
        assert_eq!(syntax_offset(b"[1 2]"), 3);
        assert_eq!(syntax_offset(b"[@]"), 1);
    }

    #[test]
    fn test_both_passes_fail_alike() {
        let json = br#"{"a":[1,2}"#;
        let counted = count_tokens(json).unwrap_err();
        let filled = tokenize(json).unwrap_err();
        assert_eq!(counted, filled);
    }

    #[test]
    fn test_tokenize_into_reuses_and_limits() {
        let mut tokens = Vec::with_capacity(64);
        assert_eq!(tokenize_into(b"[1,2,3]", &mut tokens, None).unwrap(), 4);
        assert_eq!(tokens.len(), 4);
        assert!(tokens.capacity() >= 64);

        let err = tokenize_into(b"[1,2,3]", &mut tokens, Some(3)).unwrap_err();
        assert!(matches!(err, GlbError::JsonSyntax { .. }));
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_writer_rejects_overflow() {
        let mut storage = [Token::default(); 2];
        let mut writer = TokenWriter::new(&mut storage);
        assert!(scan_into(b"[1,2]", &mut writer).is_err());
    }
}
