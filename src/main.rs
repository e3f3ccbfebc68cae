use std::process::ExitCode;

use clap::Parser;
use odds_optimizer::adapter::inbound::cli::{self, command::Cli, output};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    match cli::execute(cli, cancel).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            output::error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn cancel_on_signal(cancel: CancellationToken) -> anyhow::Result<()> {
    shutdown_signal().await?;
    info!("Shutdown signal received");
    cancel.cancel();
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
