//! Isthmus CLI - Bayesian language-family comparison
//!
//! Loads a token corpus and a prior configuration, runs the comparison
//! pipeline, and prints or writes the resulting report.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON/YAML on stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Analyze(args) => cli::analyze_command(args)?,
        Commands::Features(args) => cli::features_command(args)?,
        Commands::PrintDefaultConfig => cli::print_default_config()?,
        Commands::InitConfig(args) => cli::init_config(args)?,
        Commands::ValidateConfig(args) => cli::validate_config(args)?,
    }

    Ok(())
}
