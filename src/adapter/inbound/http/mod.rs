//! HTTP read API.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /api/v1/odds/{event_id}/{market}/{selection}` | quote, or 404 |
//! | `GET /api/v1/events/{event_id}/odds` | `{event_id, count, odds}` |
//! | `POST /api/v1/odds` | price a quote on demand |
//! | `GET /health` | `OK` while the process runs |
//! | `GET /ready` | `READY` while the cache answers, else 503 |

mod error;
mod handler;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

use crate::port::inbound::OddsQuery;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub odds: Arc<dyn OddsQuery>,
}

/// Build the API router over any [`OddsQuery`].
pub fn router(odds: Arc<dyn OddsQuery>) -> Router {
    let api_routes = Router::new()
        .route("/odds", post(handler::submit_odds))
        .route("/odds/{event_id}/{market}/{selection}", get(handler::get_odds))
        .route("/events/{event_id}/odds", get(handler::get_event_odds));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handler::health))
        .route("/ready", get(handler::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(ApiState { odds })
}

/// Serve `router` until `cancel` fires, then drain in-flight requests.
///
/// # Errors
///
/// Returns the I/O error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "HTTP API listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("HTTP API stopped");
    Ok(())
}
