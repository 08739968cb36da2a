use std::fmt;
use std::ops::Range;

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    Object,
    Array,
    String,
    /// Number, `true`, `false` or `null`.
    #[default]
    Primitive,
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Object => "object",
            TokenKind::Array => "array",
            TokenKind::String => "string",
            TokenKind::Primitive => "primitive",
        }
    }

    pub const fn is_container(self) -> bool {
        matches!(self, TokenKind::Object | TokenKind::Array)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the flat, pre-order token array.
///
/// `start..end` indexes the JSON segment; string tokens exclude their quotes.
/// `size` is the number of immediate children: keys for an object, elements
/// for an array, and exactly 1 for a string used as an object key (the key
/// owns the value token that follows it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    pub size: u32,
}

impl Token {
    pub const fn new(kind: TokenKind, start: u32, end: u32, size: u32) -> Self {
        Self {
            kind,
            start,
            end,
            size,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for a string token that introduces an object member.
    pub fn is_key(&self) -> bool {
        self.kind == TokenKind::String && self.size == 1
    }

    /// The bytes this token covers, or `None` if the range lies outside `json`.
    pub fn bytes<'a>(&self, json: &'a [u8]) -> Option<&'a [u8]> {
        json.get(self.range())
    }
}
