/// Settings for [`SceneParser`](crate::SceneParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub validate_references: bool,
    pub max_tokens: Option<usize>,
    pub strict_version: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    /// Reference validation on, no token limit, version 2 only.
    pub fn new() -> Self {
        Self {
            validate_references: true,
            max_tokens: None,
            strict_version: true,
        }
    }

    /// Check cross references and byte ranges after extraction.
    ///
    /// When disabled, out-of-range indices are left for the consumer to
    /// detect, e.g. through [`accessor_bytes`](crate::geometry::accessor_bytes).
    pub fn with_validate_references(mut self, validate: bool) -> Self {
        self.validate_references = validate;
        self
    }

    /// Reject documents whose counting pass exceeds `limit` tokens.
    pub fn with_max_tokens(mut self, limit: Option<usize>) -> Self {
        self.max_tokens = limit;
        self
    }

    /// Accept any container version when `strict` is false.
    pub fn with_strict_version(mut self, strict: bool) -> Self {
        self.strict_version = strict;
        self
    }
}
