//! CLI Argument Structures
//!
//! Command and argument definitions for the `isthmus` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use isthmus_rs::io::reports::ReportFormat;
use isthmus_rs::VERSION;

/// Bayesian language-family comparison for undeciphered scripts
#[derive(Parser)]
#[command(name = "isthmus")]
#[command(version = VERSION)]
#[command(about = "Isthmus - Bayesian language-family comparison for undeciphered scripts")]
#[command(long_about = "
Segment a symbol corpus at boundary markers, extract distributional features,
and compare candidate language families by closed-form Bayesian evidence.

Common Usage:

  # Compare the default families on a corpus
  isthmus analyze corpus.json

  # Use custom priors and write a JSON report
  isthmus analyze corpus.json --config isthmus.yml --format json --out report.json

  # Inspect the extracted features only
  isthmus features corpus.json

  # Start from the default configuration
  isthmus init-config --output isthmus.yml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank language families against a token corpus
    Analyze(AnalyzeArgs),

    /// Segment a corpus and print its feature vector
    Features(FeaturesArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate an Isthmus configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Options shared by commands that read a corpus
#[derive(Args)]
pub struct CorpusArgs {
    /// Token corpus (JSON or YAML)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep uncertain tokens instead of dropping them before segmentation
    #[arg(long)]
    pub include_uncertain: bool,

    /// Symbol code that also acts as a boundary marker
    #[arg(long, value_name = "CODE")]
    pub boundary_symbol: Option<String>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = "isthmus.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Console tables
    Table,
    /// JSON format output
    Json,
    /// YAML format output
    Yaml,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => ReportFormat::Table,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Yaml => ReportFormat::Yaml,
        }
    }
}
