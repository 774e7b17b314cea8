//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution logic
//! - output: colored console summaries

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
