//! Command Execution Logic
//!
//! Each subcommand loads its inputs, runs the library, and hands the result to
//! the output module.

use std::path::Path;

use anyhow::{bail, Context};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info};

use isthmus_rs::core::featureset::FeatureVector;
use isthmus_rs::core::segmenter::SegmentationStats;
use isthmus_rs::io::corpus::load_tokens;
use isthmus_rs::io::reports::{self, ReportFormat};
use isthmus_rs::{AnalysisPipeline, IsthmusConfig};

use crate::cli::args::{AnalyzeArgs, CorpusArgs, FeaturesArgs, InitConfigArgs, ValidateConfigArgs};
use crate::cli::output::{
    display_config_summary, display_feature_table, display_next_steps, display_verdict,
};

/// Load configuration from a file, or fall back to the built-in defaults
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<IsthmusConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            IsthmusConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?
        }
        None => {
            debug!("Using default configuration");
            IsthmusConfig::default()
        }
    };
    Ok(config)
}

/// Apply command-line overrides on top of the file configuration
fn build_pipeline(args: &CorpusArgs) -> anyhow::Result<AnalysisPipeline> {
    let mut config = load_configuration(args.config.as_deref())?;

    if args.include_uncertain {
        config.segmentation.exclude_uncertain = false;
    }
    if let Some(symbol) = &args.boundary_symbol {
        config.segmentation.boundary_symbol = Some(symbol.clone());
    }

    Ok(AnalysisPipeline::new(config)?)
}

/// Run the full comparison over a corpus
pub fn analyze_command(args: AnalyzeArgs) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&args.corpus)?;
    let corpus = load_tokens(&args.corpus.corpus)
        .with_context(|| format!("Failed to load corpus: {}", args.corpus.corpus.display()))?;

    let report = pipeline.analyze(&corpus)?;
    let format = ReportFormat::from(args.format);

    match &args.out {
        Some(out) => {
            reports::write_report(&report, format, out)?;
            println!(
                "{} {}",
                "Report saved to:".bright_green().bold(),
                out.display().to_string().cyan()
            );
            display_verdict(&report);
        }
        None if format == ReportFormat::Table => {
            print!("{}", reports::render_table(&report));
            println!();
            display_verdict(&report);
        }
        None => println!("{}", reports::render(&report, format)?),
    }

    Ok(())
}

#[derive(Serialize)]
struct FeaturesOutput<'a> {
    segmentation: &'a SegmentationStats,
    features: &'a FeatureVector,
}

/// Segment a corpus and print the extracted features
pub fn features_command(args: FeaturesArgs) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&args.corpus)?;
    let corpus = load_tokens(&args.corpus.corpus)
        .with_context(|| format!("Failed to load corpus: {}", args.corpus.corpus.display()))?;

    let (segmentation, features) = pipeline.extract_features(&corpus)?;
    let output = FeaturesOutput {
        segmentation: &segmentation.stats,
        features: &features,
    };

    match ReportFormat::from(args.format) {
        ReportFormat::Table => {
            display_feature_table(&segmentation.stats, &features, &pipeline.config().features);
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        ReportFormat::Yaml => println!("{}", serde_yaml::to_string(&output)?),
    }

    Ok(())
}

/// Print default configuration in YAML format
pub fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default isthmus configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!("{}", "# Usage: isthmus analyze --config your-config.yml <corpus>".dimmed());
    println!();

    let yaml_output = serde_yaml::to_string(&IsthmusConfig::default())?;
    println!("{}", yaml_output);

    Ok(())
}

/// Initialize a configuration file with defaults
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    IsthmusConfig::default().to_yaml_file(&args.output)?;

    println!(
        "{} {}",
        "Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    display_next_steps(&args.output);

    Ok(())
}

/// Validate a configuration file
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let config = load_configuration(Some(&args.config))?;
    if let Err(e) = config.validate() {
        eprintln!("{} {}", "Configuration validation failed:".red(), e);
        eprintln!();
        eprintln!(
            "{}",
            "Tip: use 'isthmus print-default-config' to see a valid layout".dimmed()
        );
        return Err(e.into());
    }

    println!("{}", "Configuration file is valid!".bright_green().bold());
    println!();
    display_config_summary(&config);

    Ok(())
}
