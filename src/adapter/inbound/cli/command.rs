//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Streaming odds re-pricing service
#[derive(Parser, Debug)]
#[command(name = "odds-optimizer")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consume the odds stream and serve the read API
    Run(RunArgs),

    /// Validate the configuration and print the effective settings
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Use the in-memory store and skip stream ingestion.
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}
