//! Ranking of family hypotheses and Bayes-factor interpretation.
//!
//! Families are ordered by total log evidence (descending, ties broken by
//! identifier). Every pair `(i, j)` with `i` ranked above `j` gets a Bayes
//! factor and a qualitative tier.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::core::bayesian::{FamilyEvidence, FamilyId};

/// Qualitative strength of a Bayes factor `BF(i, j)`.
///
/// Thresholds: above 100 decisive, above 10 strong, above 3 moderate, above 1
/// weak. Values below 1 map to the mirrored `*Against` tier of `1 / BF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BayesFactorTier {
    /// BF > 100
    DecisiveFor,
    /// 10 < BF <= 100
    StrongFor,
    /// 3 < BF <= 10
    ModerateFor,
    /// 1 < BF <= 3
    WeakFor,
    /// BF == 1
    Inconclusive,
    /// 1/3 <= BF < 1
    WeakAgainst,
    /// 1/10 <= BF < 1/3
    ModerateAgainst,
    /// 1/100 <= BF < 1/10
    StrongAgainst,
    /// BF < 1/100
    DecisiveAgainst,
}

impl BayesFactorTier {
    /// Classify a Bayes factor
    pub fn classify(bayes_factor: f64) -> Self {
        if bayes_factor > 1.0 {
            if bayes_factor > 100.0 {
                Self::DecisiveFor
            } else if bayes_factor > 10.0 {
                Self::StrongFor
            } else if bayes_factor > 3.0 {
                Self::ModerateFor
            } else {
                Self::WeakFor
            }
        } else if bayes_factor < 1.0 {
            Self::classify(1.0 / bayes_factor).inverse()
        } else {
            Self::Inconclusive
        }
    }

    /// Tier of the reciprocal Bayes factor
    pub fn inverse(self) -> Self {
        match self {
            Self::DecisiveFor => Self::DecisiveAgainst,
            Self::StrongFor => Self::StrongAgainst,
            Self::ModerateFor => Self::ModerateAgainst,
            Self::WeakFor => Self::WeakAgainst,
            Self::Inconclusive => Self::Inconclusive,
            Self::WeakAgainst => Self::WeakFor,
            Self::ModerateAgainst => Self::ModerateFor,
            Self::StrongAgainst => Self::StrongFor,
            Self::DecisiveAgainst => Self::DecisiveFor,
        }
    }

    /// Short label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Self::DecisiveFor => "decisive",
            Self::StrongFor => "strong",
            Self::ModerateFor => "moderate",
            Self::WeakFor => "weak",
            Self::Inconclusive => "inconclusive",
            Self::WeakAgainst => "weak (against)",
            Self::ModerateAgainst => "moderate (against)",
            Self::StrongAgainst => "strong (against)",
            Self::DecisiveAgainst => "decisive (against)",
        }
    }
}

impl fmt::Display for BayesFactorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `BF(a, b) = exp(logE(a) - logE(b))`
pub fn bayes_factor(a: &FamilyEvidence, b: &FamilyEvidence) -> f64 {
    (a.total_log_evidence - b.total_log_evidence).exp()
}

/// A family with its position in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFamily {
    /// 1-based rank
    pub rank: usize,
    /// Evidence computed for the family
    #[serde(flatten)]
    pub evidence: FamilyEvidence,
}

/// Bayes factor of a higher-ranked family over a lower-ranked one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    /// Higher-ranked family
    pub preferred: FamilyId,
    /// Lower-ranked family
    pub alternative: FamilyId,
    /// `logE(preferred) - logE(alternative)`; stays finite when the ratio overflows
    pub log_bayes_factor: f64,
    /// `exp(log_bayes_factor)`; may be infinite, which JSON writes as `null`
    #[serde(deserialize_with = "deserialize_unbounded")]
    pub bayes_factor: f64,
    /// Qualitative strength
    pub tier: BayesFactorTier,
}

/// Reads back an overflowed Bayes factor that JSON stored as `null`.
fn deserialize_unbounded<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

impl PairwiseComparison {
    fn between(preferred: &FamilyEvidence, alternative: &FamilyEvidence) -> Self {
        let log_bayes_factor = preferred.total_log_evidence - alternative.total_log_evidence;
        let bayes_factor = log_bayes_factor.exp();
        Self {
            preferred: preferred.family.clone(),
            alternative: alternative.family.clone(),
            log_bayes_factor,
            bayes_factor,
            tier: BayesFactorTier::classify(bayes_factor),
        }
    }
}

/// Ordered families plus every pairwise comparison
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Families, best first
    pub families: Vec<RankedFamily>,
    /// `(i, j)` pairs with `i` above `j`, in rank order
    pub comparisons: Vec<PairwiseComparison>,
}

impl Ranking {
    /// Best-supported family
    pub fn winner(&self) -> Option<&RankedFamily> {
        self.families.first()
    }

    /// Look up a family by identifier
    pub fn family(&self, family: &str) -> Option<&RankedFamily> {
        self.families.iter().find(|f| f.evidence.family == family)
    }

    /// Comparison for a specific ordered pair, if `preferred` ranks above `alternative`
    pub fn comparison(&self, preferred: &str, alternative: &str) -> Option<&PairwiseComparison> {
        self.comparisons
            .iter()
            .find(|c| c.preferred == preferred && c.alternative == alternative)
    }
}

/// Orders families by evidence and derives pairwise Bayes factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    /// Create a new ranker
    pub fn new() -> Self {
        Self
    }

    /// Total order: evidence descending, then family identifier ascending
    fn compare(a: &FamilyEvidence, b: &FamilyEvidence) -> Ordering {
        b.total_log_evidence
            .total_cmp(&a.total_log_evidence)
            .then_with(|| a.family.cmp(&b.family))
    }

    /// Rank families; pure and idempotent
    pub fn rank(&self, mut evidence: Vec<FamilyEvidence>) -> Ranking {
        evidence.sort_by(Self::compare);

        let mut comparisons = Vec::with_capacity(evidence.len() * evidence.len().saturating_sub(1) / 2);
        for (i, preferred) in evidence.iter().enumerate() {
            for alternative in &evidence[i + 1..] {
                comparisons.push(PairwiseComparison::between(preferred, alternative));
            }
        }

        let families: Vec<RankedFamily> = evidence
            .into_iter()
            .enumerate()
            .map(|(index, evidence)| RankedFamily {
                rank: index + 1,
                evidence,
            })
            .collect();

        if let Some(best) = families.first() {
            info!(
                family = %best.evidence.family,
                log_evidence = best.evidence.total_log_evidence,
                candidates = families.len(),
                "Ranked language families"
            );
        }

        Ranking {
            families,
            comparisons,
        }
    }
}
