//! Service runtime lifecycle.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::adapter::inbound::http;
use crate::application::ingestion::StopReason;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::bootstrap::{build_services, build_store, build_stream, Backend, Services};
use crate::infrastructure::config::Config;
use crate::port::inbound::OddsQuery;
use crate::port::outbound::QuoteStream;

/// Startup switches that are not part of the config file.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub backend: Backend,
}

impl RunOptions {
    #[must_use]
    pub const fn in_memory(in_memory: bool) -> Self {
        Self {
            backend: if in_memory {
                Backend::Memory
            } else {
                Backend::Redis
            },
        }
    }
}

/// Build everything from `config` and run until `cancel` fires.
///
/// # Errors
///
/// Startup failures (store or stream unreachable, bind failure) and HTTP
/// server errors.
pub async fn run_with_shutdown(
    config: Config,
    options: RunOptions,
    cancel: CancellationToken,
) -> Result<()> {
    info!(
        backend = ?options.backend,
        bind_addr = %config.server.bind_addr,
        "Starting odds-optimizer"
    );

    let addr = config
        .server
        .socket_addr()
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "bind_addr",
            reason: format!("'{}' is not a host:port address", config.server.bind_addr),
        })?;

    let store = build_store(&config, options.backend).await?;
    let services = build_services(&config, store, cancel.clone())?;
    let stream = build_stream(&config, options.backend).await?;
    let listener = TcpListener::bind(addr).await?;

    run_until_shutdown(&config, services, stream, listener, cancel).await
}

/// Run ingestion (when a stream is given) and the HTTP API until `cancel`
/// fires, then wait up to `shutdown_timeout` for ingestion to drain.
///
/// An HTTP server failure cancels the token so ingestion stops too. A
/// panicked ingestion task cancels the token as well.
///
/// # Errors
///
/// Returns the HTTP server error, or [`Error::Ingestion`] when the
/// ingestion task panicked.
pub async fn run_until_shutdown(
    config: &Config,
    services: Services,
    stream: Option<Box<dyn QuoteStream>>,
    listener: TcpListener,
    cancel: CancellationToken,
) -> Result<()> {
    let ingestion = stream.map(|mut stream| {
        let worker = services.ingestion(config);
        let token = cancel.clone();
        let task = tokio::spawn(async move { worker.run(stream.as_mut(), &token).await });
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = task.await;
            if let Err(e) = &outcome {
                error!(error = %e, "Ingestion task panicked, shutting down");
                cancel.cancel();
            }
            outcome
        })
    });

    let odds: Arc<dyn OddsQuery> = services.odds;
    let served = http::serve(listener, http::router(odds), cancel.clone()).await;
    if let Err(e) = &served {
        error!(error = %e, "HTTP API failed");
    }
    cancel.cancel();

    let mut ingestion_failure = None;
    if let Some(handle) = ingestion {
        match tokio::time::timeout(config.server.shutdown_timeout(), handle).await {
            Ok(Ok(Ok(report))) => {
                if report.stop_reason == Some(StopReason::StreamClosed) {
                    warn!("Stream closed before shutdown");
                }
            }
            Ok(Ok(Err(e))) | Ok(Err(e)) => ingestion_failure = Some(e.to_string()),
            Err(_) => warn!(
                timeout_secs = config.server.shutdown_timeout_secs,
                "Ingestion did not stop before the shutdown timeout"
            ),
        }
    }

    info!("odds-optimizer stopped");
    served?;
    match ingestion_failure {
        Some(reason) => Err(Error::Ingestion(reason)),
        None => Ok(()),
    }
}
