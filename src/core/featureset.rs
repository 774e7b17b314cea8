//! Distributional feature extraction over a segmented corpus.
//!
//! The feature set is fixed: segment-length moments, positional entropies,
//! within-segment transition entropy, and frequency concentration. All of them
//! are corpus-level summaries, not per-segment values.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::core::errors::{IsthmusError, Result};
use crate::core::segmenter::Segment;

/// Name of one feature in the fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    /// Mean segment length in tokens
    SegmentLengthMean,
    /// Population standard deviation of segment length
    SegmentLengthStd,
    /// Entropy (bits) of segment-initial symbols
    InitialEntropy,
    /// Entropy (bits) of segment-final symbols
    FinalEntropy,
    /// Entropy (bits) of within-segment ordered symbol pairs
    BigramEntropy,
    /// Share of all occurrences held by the most frequent symbol
    FrequencyConcentration,
}

impl FeatureName {
    /// Every feature, in schema order
    pub const ALL: [FeatureName; 6] = [
        Self::SegmentLengthMean,
        Self::SegmentLengthStd,
        Self::InitialEntropy,
        Self::FinalEntropy,
        Self::BigramEntropy,
        Self::FrequencyConcentration,
    ];

    /// Snake-case identifier used in configuration and reports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SegmentLengthMean => "segment_length_mean",
            Self::SegmentLengthStd => "segment_length_std",
            Self::InitialEntropy => "initial_entropy",
            Self::FinalEntropy => "final_entropy",
            Self::BigramEntropy => "bigram_entropy",
            Self::FrequencyConcentration => "frequency_concentration",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::SegmentLengthMean => "Mean number of signs per segment",
            Self::SegmentLengthStd => "Population std-dev of signs per segment",
            Self::InitialEntropy => "Shannon entropy of segment-initial signs (bits)",
            Self::FinalEntropy => "Shannon entropy of segment-final signs (bits)",
            Self::BigramEntropy => "Shannon entropy of adjacent sign pairs (bits)",
            Self::FrequencyConcentration => "Share of occurrences held by the commonest sign",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = IsthmusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| IsthmusError::config_feature(format!("Unknown feature '{s}'"), s))
    }
}

/// Ordered, duplicate-free subset of features that takes part in scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema(Vec<FeatureName>);

impl Default for FeatureSchema {
    /// The three features the published family priors are defined for.
    fn default() -> Self {
        Self(vec![
            FeatureName::SegmentLengthMean,
            FeatureName::FinalEntropy,
            FeatureName::BigramEntropy,
        ])
    }
}

impl FeatureSchema {
    /// Build a validated schema
    pub fn new(features: Vec<FeatureName>) -> Result<Self> {
        let schema = Self(features);
        schema.validate()?;
        Ok(schema)
    }

    /// Schema covering every feature
    pub fn full() -> Self {
        Self(FeatureName::ALL.to_vec())
    }

    /// Reject empty or duplicated schemas
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(IsthmusError::config("Feature schema must name at least one feature"));
        }
        let mut seen = HashSet::new();
        for feature in &self.0 {
            if !seen.insert(*feature) {
                return Err(IsthmusError::config_feature(
                    format!("Feature '{feature}' listed twice in schema"),
                    feature.as_str(),
                ));
            }
        }
        Ok(())
    }

    /// Features in schema order
    pub fn features(&self) -> &[FeatureName] {
        &self.0
    }

    /// Membership test
    pub fn contains(&self, feature: FeatureName) -> bool {
        self.0.contains(&feature)
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty (invalid) schema
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Corpus-level feature values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Mean segment length
    pub segment_length_mean: f64,
    /// Population standard deviation of segment length
    pub segment_length_std: f64,
    /// Entropy of segment-initial symbols (bits)
    pub initial_entropy: f64,
    /// Entropy of segment-final symbols (bits)
    pub final_entropy: f64,
    /// Entropy of within-segment bigrams (bits)
    pub bigram_entropy: f64,
    /// Share of the most frequent symbol
    pub frequency_concentration: f64,
}

impl FeatureVector {
    /// Value of a single feature
    pub fn get(&self, feature: FeatureName) -> f64 {
        match feature {
            FeatureName::SegmentLengthMean => self.segment_length_mean,
            FeatureName::SegmentLengthStd => self.segment_length_std,
            FeatureName::InitialEntropy => self.initial_entropy,
            FeatureName::FinalEntropy => self.final_entropy,
            FeatureName::BigramEntropy => self.bigram_entropy,
            FeatureName::FrequencyConcentration => self.frequency_concentration,
        }
    }

    /// Overwrite a single feature
    pub fn set(&mut self, feature: FeatureName, value: f64) -> &mut Self {
        let slot = match feature {
            FeatureName::SegmentLengthMean => &mut self.segment_length_mean,
            FeatureName::SegmentLengthStd => &mut self.segment_length_std,
            FeatureName::InitialEntropy => &mut self.initial_entropy,
            FeatureName::FinalEntropy => &mut self.final_entropy,
            FeatureName::BigramEntropy => &mut self.bigram_entropy,
            FeatureName::FrequencyConcentration => &mut self.frequency_concentration,
        };
        *slot = value;
        self
    }

    /// All `(feature, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Vector with every feature set to zero; used to build fixtures
    pub fn zeros() -> Self {
        Self {
            segment_length_mean: 0.0,
            segment_length_std: 0.0,
            initial_entropy: 0.0,
            final_entropy: 0.0,
            bigram_entropy: 0.0,
            frequency_concentration: 0.0,
        }
    }
}

/// Shannon entropy in bits of an empirical distribution given by counts.
///
/// Fewer than two observed categories yields exactly 0.
pub fn shannon_entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    if counts.len() < 2 {
        return 0.0;
    }
    let total = counts.iter().sum::<usize>() as f64;
    counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Count categorical observations; ordered so summation order is stable across runs.
fn tally<I>(items: I) -> BTreeMap<I::Item, usize>
where
    I: IntoIterator,
    I::Item: Ord,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Computes a [`FeatureVector`] from corpus segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract all features. Fails if there are no segments or one of them is empty.
    pub fn extract(&self, segments: &[Segment]) -> Result<FeatureVector> {
        if segments.is_empty() {
            return Err(IsthmusError::insufficient_data(
                "Cannot compute features from zero segments",
            ));
        }
        if let Some(empty) = segments.iter().find(|s| s.is_empty()) {
            return Err(IsthmusError::insufficient_data(format!(
                "Empty segment in text '{}' column '{}' at position {}",
                empty.text_id, empty.column, empty.start_position
            )));
        }

        let lengths: Vec<f64> = segments.iter().map(|s| s.len() as f64).collect();
        let segment_length_mean = lengths.iter().mean();
        let segment_length_std = if lengths.len() < 2 {
            0.0
        } else {
            lengths.iter().population_std_dev()
        };

        let initial_entropy =
            shannon_entropy(tally(segments.iter().filter_map(Segment::initial)).into_values());
        let final_entropy =
            shannon_entropy(tally(segments.iter().filter_map(Segment::last)).into_values());
        let bigram_entropy =
            shannon_entropy(tally(segments.iter().flat_map(Segment::bigrams)).into_values());

        let symbol_counts = tally(segments.iter().flat_map(|s| s.symbols.iter()));
        let total: usize = symbol_counts.values().sum();
        let max_count = symbol_counts.values().copied().max().unwrap_or(0);
        let frequency_concentration = if total == 0 {
            0.0
        } else {
            max_count as f64 / total as f64
        };

        let vector = FeatureVector {
            segment_length_mean,
            segment_length_std,
            initial_entropy,
            final_entropy,
            bigram_entropy,
            frequency_concentration,
        };

        debug!(
            segments = segments.len(),
            distinct_symbols = symbol_counts.len(),
            ?vector,
            "Extracted corpus features"
        );

        Ok(vector)
    }
}

#[cfg(test)]
#[path = "featureset_tests.rs"]
mod tests;
