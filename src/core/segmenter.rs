//! Boundary-driven segmentation of a symbol stream.
//!
//! Tokens are grouped by `(text, column)`, ordered by position, and cut at
//! boundary markers. The boundary token itself belongs to neither neighbour and
//! empty runs between adjacent boundaries are dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::SegmentationConfig;
use crate::core::errors::{IsthmusError, Result};
use crate::core::tokens::{ColumnId, SymbolStream, SymbolToken, TextId};

/// Maximal contiguous run of non-boundary tokens within one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Source inscription
    pub text_id: TextId,
    /// Column within the inscription
    pub column: ColumnId,
    /// Symbol codes in reading order (never empty)
    pub symbols: Vec<String>,
    /// Position of the first member token
    pub start_position: u32,
    /// Position of the last member token
    pub end_position: u32,
}

impl Segment {
    /// Number of tokens in the segment
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// The segmenter never emits empty segments; hand-built ones may be
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Segment-initial symbol code
    pub fn initial(&self) -> Option<&str> {
        self.symbols.first().map(String::as_str)
    }

    /// Segment-final symbol code
    pub fn last(&self) -> Option<&str> {
        self.symbols.last().map(String::as_str)
    }

    /// Adjacent ordered symbol pairs inside this segment
    pub fn bigrams(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbols
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Token accounting for one segmentation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationStats {
    /// Tokens in the input stream
    pub total_tokens: usize,
    /// Tokens acting as cut points
    pub boundary_tokens: usize,
    /// Uncertain tokens removed before segmentation
    pub excluded_uncertain: usize,
    /// Tokens that ended up inside a segment
    pub segmented_tokens: usize,
    /// Distinct `(text, column)` groups
    pub groups: usize,
    /// Segments emitted
    pub segments: usize,
}

/// Output of [`Segmenter::segment`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segmentation {
    /// Segments ordered by text, column, then position
    pub segments: Vec<Segment>,
    /// Token accounting
    pub stats: SegmentationStats,
}

/// Partitions a symbol stream into boundary-delimited segments.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    /// Create a segmenter with the given options
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Options in effect
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    fn is_boundary(&self, token: &SymbolToken) -> bool {
        token.is_boundary
            || self
                .config
                .boundary_symbol
                .as_deref()
                .is_some_and(|marker| marker == token.symbol_code)
    }

    /// Segment the stream. Fails with `InsufficientData` if nothing survives.
    pub fn segment(&self, stream: &SymbolStream) -> Result<Segmentation> {
        let mut stats = SegmentationStats {
            total_tokens: stream.len(),
            ..SegmentationStats::default()
        };

        // Uncertain tokens leave the stream before any cut is decided.
        let mut groups: BTreeMap<(&str, &str), Vec<&SymbolToken>> = BTreeMap::new();
        for token in stream.tokens() {
            if self.config.exclude_uncertain && token.is_uncertain {
                stats.excluded_uncertain += 1;
                continue;
            }
            groups.entry(token.group_key()).or_default().push(token);
        }
        stats.groups = groups.len();

        let mut segments = Vec::new();
        for ((text_id, column), mut tokens) in groups {
            tokens.sort_by_key(|t| t.position);

            let mut run: Vec<&SymbolToken> = Vec::new();
            for token in tokens {
                if self.is_boundary(token) {
                    stats.boundary_tokens += 1;
                    Self::close_run(text_id, column, &mut run, &mut segments);
                } else {
                    run.push(token);
                }
            }
            Self::close_run(text_id, column, &mut run, &mut segments);
        }

        stats.segments = segments.len();
        stats.segmented_tokens = segments.iter().map(Segment::len).sum();

        debug!(
            segments = stats.segments,
            groups = stats.groups,
            boundaries = stats.boundary_tokens,
            excluded = stats.excluded_uncertain,
            "Segmented symbol stream"
        );

        if segments.is_empty() {
            return Err(IsthmusError::insufficient_data(format!(
                "Corpus of {} tokens yields zero segments",
                stats.total_tokens
            )));
        }

        Ok(Segmentation { segments, stats })
    }

    fn close_run(
        text_id: &str,
        column: &str,
        run: &mut Vec<&SymbolToken>,
        segments: &mut Vec<Segment>,
    ) {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            return;
        };
        segments.push(Segment {
            text_id: text_id.to_string(),
            column: column.to_string(),
            start_position: first.position,
            end_position: last.position,
            symbols: run.iter().map(|t| t.symbol_code.clone()).collect(),
        });
        run.clear();
    }
}
