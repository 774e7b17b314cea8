//! Symbol stream model.
//!
//! A corpus arrives as a flat list of recognized mark occurrences. Each token is
//! immutable once recorded; the analysis core only ever reads them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::errors::{IsthmusError, Result};

/// Identifier of a source inscription
pub type TextId = String;

/// Identifier of a column (sub-sequence) within a text
pub type ColumnId = String;

/// One recognized mark occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolToken {
    /// Source inscription identifier
    pub text_id: TextId,

    /// Column within the text, for multi-column layouts
    pub column: ColumnId,

    /// Order of the token within its column
    pub position: u32,

    /// Categorical identifier of the mark type
    pub symbol_code: String,

    /// Whether this occurrence is the designated segment-boundary marker
    #[serde(default)]
    pub is_boundary: bool,

    /// Erosion/damage flag
    #[serde(default)]
    pub is_uncertain: bool,
}

impl SymbolToken {
    /// Create a plain (non-boundary, certain) token
    pub fn new(
        text_id: impl Into<TextId>,
        column: impl Into<ColumnId>,
        position: u32,
        symbol_code: impl Into<String>,
    ) -> Self {
        Self {
            text_id: text_id.into(),
            column: column.into(),
            position,
            symbol_code: symbol_code.into(),
            is_boundary: false,
            is_uncertain: false,
        }
    }

    /// Mark this token as a boundary marker
    pub fn boundary(mut self) -> Self {
        self.is_boundary = true;
        self
    }

    /// Mark this token as eroded/uncertain
    pub fn uncertain(mut self) -> Self {
        self.is_uncertain = true;
        self
    }

    /// Grouping key used by the segmenter
    pub fn group_key(&self) -> (&str, &str) {
        (self.text_id.as_str(), self.column.as_str())
    }
}

/// Ordered collection of symbol tokens forming one corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolStream {
    tokens: Vec<SymbolToken>,
}

impl SymbolStream {
    /// Wrap a token list, rejecting duplicate `(text, column, position)` triples
    pub fn new(tokens: Vec<SymbolToken>) -> Result<Self> {
        let stream = Self { tokens };
        stream.validate()?;
        Ok(stream)
    }

    /// Check that no two tokens claim the same slot
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.tokens.len());
        for token in &self.tokens {
            if !seen.insert((token.text_id.as_str(), token.column.as_str(), token.position)) {
                return Err(IsthmusError::validation_field(
                    format!(
                        "Duplicate token position {} in text '{}' column '{}'",
                        token.position, token.text_id, token.column
                    ),
                    format!("{}/{}/{}", token.text_id, token.column, token.position),
                ));
            }
        }
        Ok(())
    }

    /// All tokens in recorded order
    pub fn tokens(&self) -> &[SymbolToken] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the stream carries no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of distinct source texts
    pub fn text_count(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| t.text_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl FromIterator<SymbolToken> for SymbolStream {
    /// Collect without validation; call [`SymbolStream::validate`] before trusting positions.
    fn from_iter<I: IntoIterator<Item = SymbolToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
