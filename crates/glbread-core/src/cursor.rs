//! Bounds-checked cursor over a flat token array.
//!
//! The cursor never reads past the array: every advance is checked and an
//! overrun is reported as a JSON syntax error at the end of the document.
//! [`TokenCursor::skip`] is the primitive every extractor relies on to step
//! over values it does not interpret. It is driven purely by child-counts, so
//! it lands on the next sibling whatever the shape of the skipped subtree.

use log::trace;
use num_traits::{FromPrimitive, PrimInt, Unsigned};

use crate::integer::{convert_integer, IntegerError};
use crate::status::{GlbError, Result, SchemaError};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    json: &'a [u8],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// Positions a cursor on the first token. `json` is the text the tokens
    /// index into.
    pub fn new(tokens: &'a [Token], json: &'a [u8]) -> Self {
        Self {
            tokens,
            json,
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// JSON byte offset of the next token, or the document length at the end.
    pub fn offset(&self) -> usize {
        self.peek()
            .map(|token| token.start as usize)
            .unwrap_or(self.json.len())
    }

    fn overrun(&self) -> GlbError {
        GlbError::overrun(self.json.len(), "unexpected end of token stream")
    }

    pub fn next_token(&mut self) -> Result<&'a Token> {
        let token = self.peek().ok_or_else(|| self.overrun())?;
        self.pos += 1;
        Ok(token)
    }

    /// The JSON bytes covered by `token`.
    pub fn bytes(&self, token: &Token) -> Result<&'a [u8]> {
        token
            .bytes(self.json)
            .ok_or_else(|| GlbError::overrun(token.start as usize, "token range outside document"))
    }

    /// Consumes the next token if it has the `expected` kind. Containers must
    /// have enough tokens left to hold their declared children.
    pub fn expect_kind(&mut self, expected: TokenKind) -> Result<&'a Token> {
        let token = self.peek().ok_or_else(|| self.overrun())?;
        if token.kind != expected {
            return Err(SchemaError::UnexpectedKind {
                offset: token.start as usize,
                expected,
                found: token.kind,
            }
            .into());
        }
        let needed = match token.kind {
            TokenKind::Object => token.size as usize * 2,
            TokenKind::Array => token.size as usize,
            _ => 0,
        };
        if needed > self.remaining() - 1 {
            return Err(GlbError::overrun(
                token.start as usize,
                "container declares more children than remain",
            ));
        }
        self.pos += 1;
        Ok(token)
    }

    /// Consumes an object token and returns its key count.
    pub fn expect_object(&mut self) -> Result<u32> {
        self.expect_kind(TokenKind::Object).map(|token| token.size)
    }

    /// Consumes an array token and returns its element count.
    pub fn expect_array(&mut self) -> Result<u32> {
        self.expect_kind(TokenKind::Array).map(|token| token.size)
    }

    /// Consumes an object key and returns its bytes.
    pub fn expect_key(&mut self) -> Result<&'a [u8]> {
        let token = self.next_token()?;
        if !token.is_key() {
            return Err(GlbError::overrun(token.start as usize, "expected object key"));
        }
        self.bytes(token)
    }

    /// Steps over the value at the cursor, including its whole subtree.
    ///
    /// Every token owns `size` immediate children (an object key owns its
    /// value), so the subtree ends once the count of owed tokens reaches zero.
    /// Runs in constant stack space whatever the nesting depth.
    pub fn skip(&mut self) -> Result<()> {
        let mut owed: u64 = 1;
        while owed > 0 {
            let token = self.next_token()?;
            owed = owed - 1 + u64::from(token.size);
        }
        Ok(())
    }

    /// Reads a non-negative decimal integer primitive.
    pub fn read_integer<T>(&mut self) -> Result<T>
    where
        T: PrimInt + Unsigned + FromPrimitive,
    {
        let token = self.next_token()?;
        let start = token.start as usize;
        if token.kind != TokenKind::Primitive {
            return Err(GlbError::UnsupportedValue {
                offset: start,
                reason: "expected an integer literal",
            });
        }
        let digits = self.bytes(token)?;
        convert_integer(digits).map_err(|err| {
            let offset = match err {
                IntegerError::InvalidDigit { position } => start + position,
                _ => start,
            };
            GlbError::UnsupportedValue {
                offset,
                reason: err.reason(),
            }
        })
    }

    /// Reads a string value and returns its raw (unescaped) bytes.
    pub fn read_string(&mut self) -> Result<&'a [u8]> {
        let token = self.expect_kind(TokenKind::String)?;
        self.bytes(token)
    }

    /// Iterates the members of the object at the cursor.
    ///
    /// `visit` receives each key with the cursor on its value and returns
    /// whether it consumed the value. Unconsumed values are skipped.
    pub fn walk_object<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut Self, &'a [u8]) -> Result<bool>,
    {
        let members = self.expect_object()?;
        for _ in 0..members {
            let key = self.expect_key()?;
            if !visit(self, key)? {
                trace!("skipping member {:?}", String::from_utf8_lossy(key));
                self.skip()?;
            }
        }
        Ok(())
    }

    /// Iterates the elements of the array at the cursor. `visit` must consume
    /// exactly one value per call. Returns the element count.
    pub fn walk_array<F>(&mut self, mut visit: F) -> Result<u32>
    where
        F: FnMut(&mut Self, usize) -> Result<()>,
    {
        let len = self.expect_array()?;
        for index in 0..len as usize {
            visit(self, index)?;
        }
        Ok(len)
    }
}
