//! End-to-end comparison pipeline.
//!
//! ```text
//! SymbolStream -> Segmenter -> FeatureExtractor -> EvidenceEngine -> Ranker
//! ```
//!
//! Each stage is pure over its input. The pipeline owns the validated
//! configuration and the optional worker pool used for family evaluation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::bayesian::{EvidenceEngine, FamilyEvidence};
use crate::core::config::IsthmusConfig;
use crate::core::errors::{IsthmusError, Result};
use crate::core::featureset::{FeatureExtractor, FeatureName, FeatureSchema, FeatureVector};
use crate::core::scoring::{PairwiseComparison, RankedFamily, Ranker, Ranking};
use crate::core::segmenter::{Segmentation, SegmentationStats, Segmenter};
use crate::core::tokens::SymbolStream;

/// Result of one full comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Token and segment accounting
    pub segmentation: SegmentationStats,
    /// Features that took part in scoring
    pub schema: FeatureSchema,
    /// Every extracted feature, scored or not
    pub features: FeatureVector,
    /// Families ordered by evidence with pairwise Bayes factors
    pub ranking: Ranking,
}

impl ComparisonReport {
    /// Best-supported family
    pub fn winner(&self) -> Option<&RankedFamily> {
        self.ranking.winner()
    }

    /// Observed values of the scored features, in schema order
    pub fn observed(&self) -> IndexMap<FeatureName, f64> {
        self.schema
            .features()
            .iter()
            .map(|&feature| (feature, self.features.get(feature)))
            .collect()
    }

    /// Comparisons between adjacent ranks
    pub fn adjacent_comparisons(&self) -> impl Iterator<Item = &PairwiseComparison> {
        self.ranking.families.windows(2).filter_map(|pair| {
            self.ranking
                .comparison(&pair[0].evidence.family, &pair[1].evidence.family)
        })
    }
}

/// Orchestrates segmentation, feature extraction, evidence and ranking.
#[derive(Debug)]
pub struct AnalysisPipeline {
    config: IsthmusConfig,
    segmenter: Segmenter,
    extractor: FeatureExtractor,
    engine: EvidenceEngine,
    ranker: Ranker,
    pool: Option<rayon::ThreadPool>,
}

impl AnalysisPipeline {
    /// Validate the configuration and build every stage up front
    pub fn new(config: IsthmusConfig) -> Result<Self> {
        let registry = config.validated_registry()?;

        let engine = EvidenceEngine::new(
            registry,
            config.observation.clone(),
            config.evidence_model,
        )?
        .with_parallel(config.performance.parallel);

        let pool = match config.performance.max_threads {
            Some(threads) if engine.is_parallel() => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        IsthmusError::config(format!("Failed to build worker pool: {e}"))
                    })?,
            ),
            _ => None,
        };

        info!(
            families = engine.registry().len(),
            features = config.features.len(),
            parallel = engine.is_parallel(),
            "Analysis pipeline ready"
        );

        Ok(Self {
            segmenter: Segmenter::new(config.segmentation.clone()),
            extractor: FeatureExtractor::new(),
            engine,
            ranker: Ranker::new(),
            pool,
            config,
        })
    }

    /// Configuration in effect
    pub fn config(&self) -> &IsthmusConfig {
        &self.config
    }

    /// Cut the stream into segments
    pub fn segment(&self, stream: &SymbolStream) -> Result<Segmentation> {
        self.segmenter.segment(stream)
    }

    /// Segment the stream and summarise it as a feature vector
    pub fn extract_features(&self, stream: &SymbolStream) -> Result<(Segmentation, FeatureVector)> {
        let segmentation = self.segment(stream)?;
        let features = self.extractor.extract(&segmentation.segments)?;
        Ok((segmentation, features))
    }

    /// Per-family evidence for an observed feature vector
    pub fn evaluate(&self, observed: &FeatureVector) -> Result<Vec<FamilyEvidence>> {
        match &self.pool {
            Some(pool) => pool.install(|| self.engine.evaluate(observed)),
            None => self.engine.evaluate(observed),
        }
    }

    /// Score and rank families for an observed feature vector
    pub fn score(&self, observed: &FeatureVector) -> Result<Ranking> {
        let evidence = self.evaluate(observed)?;
        Ok(self.ranker.rank(evidence))
    }

    /// Run every stage over a corpus
    pub fn analyze(&self, stream: &SymbolStream) -> Result<ComparisonReport> {
        stream.validate()?;
        info!(
            tokens = stream.len(),
            texts = stream.text_count(),
            "Starting comparison"
        );

        let (segmentation, features) = self.extract_features(stream)?;
        debug!(?features, "Extracted corpus features");

        let ranking = self.score(&features)?;

        if let Some(best) = ranking.winner() {
            info!(
                family = %best.evidence.family,
                log_evidence = best.evidence.total_log_evidence,
                segments = segmentation.stats.segments,
                "Comparison complete"
            );
        }

        Ok(ComparisonReport {
            segmentation: segmentation.stats,
            schema: self.config.features.clone(),
            features,
            ranking,
        })
    }
}
