//! Console Output Helpers
//!
//! Colored summaries printed around the plain report tables.

use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use isthmus_rs::core::featureset::{FeatureSchema, FeatureVector};
use isthmus_rs::core::segmenter::SegmentationStats;
use isthmus_rs::{BayesFactorTier, ComparisonReport, IsthmusConfig};

/// One-line verdict on the best-supported family
pub fn display_verdict(report: &ComparisonReport) {
    let Some(best) = report.winner() else {
        return;
    };

    println!(
        "{} {}",
        "Best supported family:".bright_blue().bold(),
        best.evidence.family.bright_green().bold()
    );

    for comparison in report.adjacent_comparisons() {
        let tier = match comparison.tier {
            BayesFactorTier::DecisiveFor | BayesFactorTier::StrongFor => {
                comparison.tier.to_string().green().to_string()
            }
            BayesFactorTier::ModerateFor | BayesFactorTier::WeakFor => {
                comparison.tier.to_string().yellow().to_string()
            }
            _ => comparison.tier.to_string().dimmed().to_string(),
        };
        println!(
            "   {} over {}: log BF = {:.3} ({})",
            comparison.preferred, comparison.alternative, comparison.log_bayes_factor, tier
        );
    }
}

/// Feature vector with segmentation accounting
pub fn display_feature_table(
    stats: &SegmentationStats,
    features: &FeatureVector,
    schema: &FeatureSchema,
) {
    #[derive(Tabled)]
    struct FeatureRow {
        feature: String,
        value: String,
        scored: String,
        description: String,
    }

    println!(
        "{} {} segments in {} groups ({} tokens, {} boundaries, {} uncertain excluded)",
        "Segmentation:".bright_blue().bold(),
        stats.segments,
        stats.groups,
        stats.total_tokens,
        stats.boundary_tokens,
        stats.excluded_uncertain
    );
    println!();

    let rows: Vec<FeatureRow> = features
        .iter()
        .map(|(feature, value)| FeatureRow {
            feature: feature.to_string(),
            value: format!("{value:.4}"),
            scored: if schema.contains(feature) { "yes" } else { "no" }.to_string(),
            description: feature.description().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
}

/// Summary of a validated configuration
pub fn display_config_summary(config: &IsthmusConfig) {
    #[derive(Tabled)]
    struct ConfigRow {
        setting: String,
        value: String,
    }

    let features: Vec<&str> = config.features.features().iter().map(|f| f.as_str()).collect();
    let families: Vec<&str> = config.priors.keys().map(String::as_str).collect();

    let config_rows = vec![
        ConfigRow {
            setting: "Families".to_string(),
            value: families.join(", "),
        },
        ConfigRow {
            setting: "Scored features".to_string(),
            value: features.join(", "),
        },
        ConfigRow {
            setting: "Observation variance".to_string(),
            value: format!(
                "{} ({} overrides)",
                config.observation.default,
                config.observation.per_feature.len()
            ),
        },
        ConfigRow {
            setting: "Exclude uncertain".to_string(),
            value: config.segmentation.exclude_uncertain.to_string(),
        },
        ConfigRow {
            setting: "Boundary symbol".to_string(),
            value: config
                .segmentation
                .boundary_symbol
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        },
        ConfigRow {
            setting: "Parallel".to_string(),
            value: {
                let mut value = config.performance.parallel.to_string();
                if let Some(threads) = config.performance.max_threads {
                    value.push_str(&format!(" ({threads} threads)"));
                }
                if config.performance.parallel && !isthmus_rs::features::has_parallel() {
                    value.push_str(" (not compiled in)");
                }
                value
            },
        },
    ];

    let mut table = Table::new(config_rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
    println!();
}

/// Hints printed after writing a new configuration file
pub fn display_next_steps(config_path: &Path) {
    println!("{}", "Next steps:".bright_blue().bold());
    println!("   1. Edit the priors and feature schema to match your hypotheses");
    println!(
        "   2. Run analysis with: {}",
        format!("isthmus analyze --config {} <corpus>", config_path.display()).cyan()
    );
}
