use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::error::ApiError;
use super::ApiState;
use crate::domain::{NormalizedQuote, QuoteKey, RepricedQuote};

#[derive(Debug, Deserialize)]
pub struct OddsPath {
    event_id: String,
    market: String,
    selection: String,
}

/// Body of the event lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventOdds {
    pub event_id: String,
    pub count: usize,
    pub odds: Vec<RepricedQuote>,
}

pub async fn get_odds(
    State(state): State<ApiState>,
    Path(path): Path<OddsPath>,
) -> Result<Json<RepricedQuote>, ApiError> {
    let key = QuoteKey::new(path.event_id, path.market, path.selection);

    match state.odds.lookup(&key).await {
        Some(quote) => Ok(Json(quote)),
        None => {
            debug!(key = %key, "Odds not found");
            Err(ApiError::NotFound)
        }
    }
}

pub async fn get_event_odds(
    State(state): State<ApiState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventOdds>, ApiError> {
    let odds = state.odds.lookup_by_event(&event_id).await.map_err(|e| {
        error!(event_id = %event_id, error = %e, "Failed to retrieve event odds");
        ApiError::Retrieval
    })?;

    Ok(Json(EventOdds {
        count: odds.len(),
        event_id,
        odds,
    }))
}

pub async fn submit_odds(
    State(state): State<ApiState>,
    Json(quote): Json<NormalizedQuote>,
) -> Result<Json<RepricedQuote>, ApiError> {
    let repriced = state.odds.submit(&quote).await?;
    Ok(Json(repriced))
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn ready(State(state): State<ApiState>) -> (StatusCode, &'static str) {
    if state.odds.ready().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "cache unavailable")
    }
}
