//! Gaussian family priors and closed-form Bayesian evidence.
//!
//! Each family hypothesis assigns every scored feature a Normal prior. With a
//! Normal observation model on the point-estimate statistic, the marginal
//! likelihood of an observed value is itself Normal with the two variances
//! summed:
//!
//! ```text
//! combined = stdev_prior^2 + obs_variance
//! log L    = -0.5 * ln(2 * pi * combined) - (x - mean_prior)^2 / (2 * combined)
//! ```
//!
//! Under [`EvidenceModel::Independent`] the family's log evidence is the plain
//! sum over features. No cross-feature covariance is modelled.

use std::f64::consts::PI;

use indexmap::IndexMap;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::{EvidenceModel, ObservationVariance, PriorTable};
use crate::core::errors::{IsthmusError, Result};
use crate::core::featureset::{FeatureName, FeatureSchema, FeatureVector};

/// Identifier of a candidate language family
pub type FamilyId = String;

/// Gaussian prior on one feature under one family hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorSpec {
    /// Expected value of the feature
    pub mean: f64,
    /// Standard deviation; strictly positive
    pub stdev: f64,
}

impl PriorSpec {
    /// Create a new prior
    pub fn new(mean: f64, stdev: f64) -> Self {
        Self { mean, stdev }
    }

    /// Prior variance
    pub fn variance(&self) -> f64 {
        self.stdev * self.stdev
    }

    fn validate(&self, family: &str, feature: FeatureName) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(IsthmusError::config_prior(
                format!("Prior mean for '{family}'/'{feature}' must be finite"),
                family,
                feature.as_str(),
            ));
        }
        if !self.stdev.is_finite() || self.stdev <= 0.0 {
            return Err(IsthmusError::config_prior(
                format!(
                    "Prior stdev for '{family}'/'{feature}' must be > 0, got {}",
                    self.stdev
                ),
                family,
                feature.as_str(),
            ));
        }
        Ok(())
    }
}

/// Immutable lookup from `(family, feature)` to [`PriorSpec`].
///
/// Construction guarantees every family covers every feature of the schema
/// with a positive standard deviation.
#[derive(Debug, Clone)]
pub struct PriorRegistry {
    schema: FeatureSchema,
    families: PriorTable,
}

impl PriorRegistry {
    /// Validate and freeze a prior table against the active feature schema
    pub fn new(families: PriorTable, schema: &FeatureSchema) -> Result<Self> {
        schema.validate()?;

        if families.is_empty() {
            return Err(IsthmusError::config("Prior registry needs at least one family"));
        }

        for (family, priors) in &families {
            if family.trim().is_empty() {
                return Err(IsthmusError::config("Family identifier must not be empty"));
            }

            for &feature in schema.features() {
                if !priors.contains_key(&feature) {
                    return Err(IsthmusError::config_prior(
                        format!("Family '{family}' has no prior for feature '{feature}'"),
                        family.as_str(),
                        feature.as_str(),
                    ));
                }
            }

            for (&feature, prior) in priors {
                prior.validate(family, feature)?;
                if !schema.contains(feature) {
                    debug!(%family, %feature, "Prior defined for feature outside the schema");
                }
            }
        }

        Ok(Self {
            schema: schema.clone(),
            families,
        })
    }

    /// Prior for a `(family, feature)` pair
    pub fn get(&self, family: &str, feature: FeatureName) -> Option<&PriorSpec> {
        self.families.get(family)?.get(&feature)
    }

    /// Family identifiers in configuration order
    pub fn families(&self) -> impl Iterator<Item = &FamilyId> {
        self.families.keys()
    }

    /// Number of families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Always false for a constructed registry
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Schema the registry was validated against
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

/// Log marginal likelihood of one observed value under a Normal prior.
pub fn gaussian_log_evidence(observed: f64, prior: &PriorSpec, obs_variance: f64) -> f64 {
    let combined_var = prior.variance() + obs_variance;
    -0.5 * (2.0 * PI * combined_var).ln()
        - (observed - prior.mean).powi(2) / (2.0 * combined_var)
}

/// Evidence of the observed features under one family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyEvidence {
    /// Family identifier
    pub family: FamilyId,
    /// Per-feature log-likelihood contributions, in schema order
    pub contributions: IndexMap<FeatureName, f64>,
    /// Sum of the contributions
    pub total_log_evidence: f64,
}

impl FamilyEvidence {
    /// Build from contributions; the total is their sum
    pub fn from_contributions(
        family: impl Into<FamilyId>,
        contributions: IndexMap<FeatureName, f64>,
    ) -> Self {
        let total_log_evidence = contributions.values().sum();
        Self {
            family: family.into(),
            contributions,
            total_log_evidence,
        }
    }

    /// Feature contributing the least evidence (most negative log-likelihood)
    pub fn weakest_feature(&self) -> Option<(FeatureName, f64)> {
        self.contributions
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&f, &v)| (f, v))
    }
}

/// Scores an observed [`FeatureVector`] against every family in a registry.
#[derive(Debug, Clone)]
pub struct EvidenceEngine {
    registry: PriorRegistry,
    observation: ObservationVariance,
    model: EvidenceModel,
    parallel: bool,
}

impl EvidenceEngine {
    /// Create an engine; negative observation variances fail here, not during scoring
    pub fn new(
        registry: PriorRegistry,
        observation: ObservationVariance,
        model: EvidenceModel,
    ) -> Result<Self> {
        observation.validate(registry.schema())?;
        Ok(Self {
            registry,
            observation,
            model,
            parallel: false,
        })
    }

    /// Evaluate families on the rayon pool when the `parallel` feature is built in
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        if parallel && !crate::features::has_parallel() {
            warn!("Parallel evaluation requested but the `parallel` feature is disabled");
        }
        self.parallel = parallel;
        self
    }

    /// Whether families are evaluated on the rayon pool
    pub fn is_parallel(&self) -> bool {
        self.parallel && crate::features::has_parallel()
    }

    /// Prior registry in use
    pub fn registry(&self) -> &PriorRegistry {
        &self.registry
    }

    /// Observation variances in use
    pub fn observation(&self) -> &ObservationVariance {
        &self.observation
    }

    /// Evidence for every family, in registry order
    pub fn evaluate(&self, observed: &FeatureVector) -> Result<Vec<FamilyEvidence>> {
        for &feature in self.registry.schema().features() {
            let value = observed.get(feature);
            if !value.is_finite() {
                return Err(IsthmusError::validation_field(
                    format!("Observed value for '{feature}' is not finite: {value}"),
                    feature.as_str(),
                ));
            }
        }

        let families: Vec<&FamilyId> = self.registry.families().collect();

        #[cfg(feature = "parallel")]
        if self.parallel {
            return families
                .par_iter()
                .map(|family| self.evaluate_family(family, observed))
                .collect();
        }

        families
            .iter()
            .map(|family| self.evaluate_family(family, observed))
            .collect()
    }

    /// Evidence for a single family
    pub fn evaluate_family(&self, family: &str, observed: &FeatureVector) -> Result<FamilyEvidence> {
        match self.model {
            EvidenceModel::Independent => self.independent_evidence(family, observed),
        }
    }

    fn independent_evidence(&self, family: &str, observed: &FeatureVector) -> Result<FamilyEvidence> {
        let mut contributions = IndexMap::with_capacity(self.registry.schema().len());

        for &feature in self.registry.schema().features() {
            let prior = self.registry.get(family, feature).ok_or_else(|| {
                IsthmusError::config_prior(
                    format!("Family '{family}' has no prior for feature '{feature}'"),
                    family,
                    feature.as_str(),
                )
            })?;
            let log_l = gaussian_log_evidence(
                observed.get(feature),
                prior,
                self.observation.variance(feature),
            );
            contributions.insert(feature, log_l);
        }

        let evidence = FamilyEvidence::from_contributions(family, contributions);
        debug!(
            family = %evidence.family,
            total = evidence.total_log_evidence,
            "Computed family evidence"
        );
        Ok(evidence)
    }
}

#[cfg(test)]
#[path = "bayesian_tests.rs"]
mod tests;
