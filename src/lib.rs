//! # Isthmus-RS: Bayesian Language-Family Comparison
//!
//! Quantitative comparison of candidate language-family hypotheses for an
//! undeciphered writing system. The library provides:
//!
//! - **Segmentation**: boundary-driven partition of a symbol stream
//! - **Features**: segment-length moments, positional and bigram entropies
//! - **Evidence**: closed-form Normal-Normal marginal likelihoods per family
//! - **Ranking**: Bayes factors with qualitative strength tiers
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Pipeline                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Tokens  →  Segmenter  →  Features  →  Evidence  →  Ranking  │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Config (YAML/JSON)           │  I/O: corpus files, reports  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use isthmus_rs::{AnalysisPipeline, IsthmusConfig};
//! use isthmus_rs::io::corpus::load_tokens;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = AnalysisPipeline::new(IsthmusConfig::default())?;
//!     let corpus = load_tokens("corpus.json")?;
//!     let report = pipeline.analyze(&corpus)?;
//!
//!     if let Some(best) = report.winner() {
//!         println!("Best supported: {}", best.evidence.family);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

// Core comparison engine modules
pub mod core {
    //! Core comparison algorithms and data structures.

    pub mod bayesian;
    pub mod config;
    pub mod errors;
    pub mod featureset;
    pub mod pipeline;
    pub mod scoring;
    pub mod segmenter;
    pub mod tokens;
}

// Corpus ingestion and reporting
pub mod io {
    //! Corpus files and report output.

    pub mod corpus;
    pub mod reports;
}

// Re-export primary types for convenience
pub use core::bayesian::{EvidenceEngine, FamilyEvidence, FamilyId, PriorRegistry, PriorSpec};
pub use core::config::{EvidenceModel, IsthmusConfig, ObservationVariance, SegmentationConfig};
pub use core::errors::{IsthmusError, Result};
pub use core::featureset::{FeatureExtractor, FeatureName, FeatureSchema, FeatureVector};
pub use core::pipeline::{AnalysisPipeline, ComparisonReport};
pub use core::scoring::{BayesFactorTier, PairwiseComparison, RankedFamily, Ranker, Ranking};
pub use core::segmenter::{Segment, Segmentation, SegmentationStats, Segmenter};
pub use core::tokens::{SymbolStream, SymbolToken};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build-time feature detection
pub mod features {
    /// Check if parallel family evaluation is compiled in
    pub const fn has_parallel() -> bool {
        cfg!(feature = "parallel")
    }
}
