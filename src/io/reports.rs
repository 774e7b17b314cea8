//! Comparison report rendering.
//!
//! Reports are emitted as pretty JSON, YAML, or a plain-text table summary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

use crate::core::errors::{IsthmusError, Result};
use crate::core::pipeline::ComparisonReport;

/// Available report formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Console tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Observed")]
    observed: String,
    #[tabled(rename = "Scored")]
    scored: String,
}

#[derive(Tabled)]
struct FamilyRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "log E")]
    log_evidence: String,
    #[tabled(rename = "Weakest feature")]
    weakest: String,
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Preferred")]
    preferred: String,
    #[tabled(rename = "Alternative")]
    alternative: String,
    #[tabled(rename = "log BF")]
    log_bayes_factor: String,
    #[tabled(rename = "BF")]
    bayes_factor: String,
    #[tabled(rename = "Strength")]
    tier: String,
}

fn format_bayes_factor(bf: f64) -> String {
    if bf.is_infinite() {
        "inf".to_string()
    } else if bf >= 1e4 {
        format!("{bf:.3e}")
    } else {
        format!("{bf:.3}")
    }
}

/// Render the report as console tables
pub fn render_table(report: &ComparisonReport) -> String {
    let stats = &report.segmentation;
    let mut out = format!(
        "Segments: {} from {} tokens ({} boundaries, {} uncertain excluded, {} groups)\n\n",
        stats.segments,
        stats.total_tokens,
        stats.boundary_tokens,
        stats.excluded_uncertain,
        stats.groups
    );

    let features: Vec<FeatureRow> = report
        .features
        .iter()
        .map(|(feature, value)| FeatureRow {
            feature: feature.to_string(),
            observed: format!("{value:.4}"),
            scored: if report.schema.contains(feature) { "yes" } else { "no" }.to_string(),
        })
        .collect();
    let mut table = Table::new(features);
    table.with(Style::rounded());
    out.push_str(&table.to_string());
    out.push_str("\n\n");

    let families: Vec<FamilyRow> = report
        .ranking
        .families
        .iter()
        .map(|ranked| FamilyRow {
            rank: ranked.rank,
            family: ranked.evidence.family.clone(),
            log_evidence: format!("{:.4}", ranked.evidence.total_log_evidence),
            weakest: ranked
                .evidence
                .weakest_feature()
                .map(|(feature, value)| format!("{feature} ({value:.3})"))
                .unwrap_or_default(),
        })
        .collect();
    let mut table = Table::new(families);
    table.with(Style::rounded());
    out.push_str(&table.to_string());

    if !report.ranking.comparisons.is_empty() {
        let comparisons: Vec<ComparisonRow> = report
            .ranking
            .comparisons
            .iter()
            .map(|c| ComparisonRow {
                preferred: c.preferred.clone(),
                alternative: c.alternative.clone(),
                log_bayes_factor: format!("{:.4}", c.log_bayes_factor),
                bayes_factor: format_bayes_factor(c.bayes_factor),
                tier: c.tier.to_string(),
            })
            .collect();
        let mut table = Table::new(comparisons);
        table.with(Style::rounded());
        out.push_str("\n\n");
        out.push_str(&table.to_string());
    }

    out.push('\n');
    out
}

/// Render the report in the requested format
pub fn render(report: &ComparisonReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(render_table(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(report)?),
    }
}

/// Render and write the report to a file
pub fn write_report(
    report: &ComparisonReport,
    format: ReportFormat,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let content = render(report, format)?;
    std::fs::write(path, content).map_err(|e| {
        IsthmusError::io(format!("Failed to write report: {}", path.display()), e)
    })
}
