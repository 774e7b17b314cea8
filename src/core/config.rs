//! Configuration types and management for isthmus-rs.
//!
//! Configuration is loaded once, validated once, and then handed to the
//! pipeline as an immutable value. Nothing in the scoring path reads global
//! state.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::bayesian::{FamilyId, PriorRegistry, PriorSpec};
use crate::core::errors::{IsthmusError, Result};
use crate::core::featureset::{FeatureName, FeatureSchema};

/// Prior table as written in configuration: family -> feature -> prior
pub type PriorTable = IndexMap<FamilyId, IndexMap<FeatureName, PriorSpec>>;

/// Main configuration for the comparison engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsthmusConfig {
    /// Segmentation options
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Features that take part in scoring
    #[serde(default)]
    pub features: FeatureSchema,

    /// Observation noise of each point-estimate statistic
    #[serde(default)]
    pub observation: ObservationVariance,

    /// How per-feature evidence is combined
    #[serde(default)]
    pub evidence_model: EvidenceModel,

    /// Gaussian priors per language family
    pub priors: PriorTable,

    /// Performance and resource limits
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl Default for IsthmusConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            features: FeatureSchema::default(),
            observation: ObservationVariance::default(),
            evidence_model: EvidenceModel::default(),
            priors: Self::published_priors(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl IsthmusConfig {
    /// Mixe-Zoquean and Huastecan typological priors over the default schema
    pub fn published_priors() -> PriorTable {
        let mut priors = PriorTable::new();

        priors.insert(
            "MZ".to_string(),
            IndexMap::from([
                (FeatureName::SegmentLengthMean, PriorSpec::new(5.0, 1.5)),
                (FeatureName::FinalEntropy, PriorSpec::new(2.0, 0.5)),
                (FeatureName::BigramEntropy, PriorSpec::new(4.5, 1.0)),
            ]),
        );

        priors.insert(
            "Huastecan".to_string(),
            IndexMap::from([
                (FeatureName::SegmentLengthMean, PriorSpec::new(6.0, 2.0)),
                (FeatureName::FinalEntropy, PriorSpec::new(1.8, 0.4)),
                (FeatureName::BigramEntropy, PriorSpec::new(4.0, 1.0)),
            ]),
        );

        priors
    }

    /// Load configuration from a YAML or JSON file (by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            IsthmusError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).map_err(Into::into)
        } else {
            serde_yaml::from_str(&content).map_err(Into::into)
        }
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            IsthmusError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate every section and build the prior registry from the result
    pub fn validated_registry(&self) -> Result<PriorRegistry> {
        self.features.validate()?;
        self.observation.validate(&self.features)?;
        self.performance.validate()?;
        PriorRegistry::new(self.priors.clone(), &self.features)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validated_registry().map(|_| ())
    }
}

/// Segmentation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Drop eroded/uncertain tokens before cutting
    pub exclude_uncertain: bool,

    /// Symbol code that also counts as a boundary marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_symbol: Option<String>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            exclude_uncertain: true,
            boundary_symbol: None,
        }
    }
}

/// Sampling noise assumed on each observed statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationVariance {
    /// Variance used for features without an override
    pub default: f64,

    /// Per-feature overrides
    #[serde(default)]
    pub per_feature: IndexMap<FeatureName, f64>,
}

impl Default for ObservationVariance {
    fn default() -> Self {
        Self {
            default: 0.1,
            per_feature: IndexMap::new(),
        }
    }
}

impl ObservationVariance {
    /// Same variance for every feature
    pub fn uniform(variance: f64) -> Self {
        Self {
            default: variance,
            per_feature: IndexMap::new(),
        }
    }

    /// Override the variance of one feature
    pub fn with_feature(mut self, feature: FeatureName, variance: f64) -> Self {
        self.per_feature.insert(feature, variance);
        self
    }

    /// Variance for a feature
    pub fn variance(&self, feature: FeatureName) -> f64 {
        self.per_feature
            .get(&feature)
            .copied()
            .unwrap_or(self.default)
    }

    /// Every variance reachable from the schema must be finite and non-negative
    pub fn validate(&self, schema: &FeatureSchema) -> Result<()> {
        let overrides = self.per_feature.iter().map(|(&f, &v)| (f, v));
        let effective = schema.features().iter().map(|&f| (f, self.variance(f)));

        for (feature, variance) in effective.chain(overrides) {
            if !variance.is_finite() || variance < 0.0 {
                return Err(IsthmusError::config_feature(
                    format!("Observation variance for '{feature}' must be >= 0, got {variance}"),
                    feature.as_str(),
                ));
            }
        }
        Ok(())
    }
}

/// How per-feature log-likelihoods are combined into family evidence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceModel {
    /// Features are conditionally independent given the family; no covariance
    #[default]
    Independent,
}

/// Performance and resource limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Evaluate families on the rayon pool (requires the `parallel` feature)
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Maximum number of worker threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,
}

fn default_parallel() -> bool {
    cfg!(feature = "parallel")
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            max_threads: None,
        }
    }
}

impl PerformanceConfig {
    /// Validate performance configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(threads) = self.max_threads {
            if threads == 0 {
                return Err(IsthmusError::validation_field(
                    "max_threads must be greater than 0",
                    "performance.max_threads",
                ));
            }
        }
        Ok(())
    }
}
