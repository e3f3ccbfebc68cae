//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
pub mod run;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use command::{Cli, Commands};

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Propagates the command's failure; the binary maps it to a non-zero exit.
pub async fn execute(cli: Cli, cancel: CancellationToken) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        Commands::Run(args) => run::execute(&args, cancel).await,
        Commands::Check(args) => check::execute(&args),
    }
}
