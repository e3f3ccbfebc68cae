use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domain::DomainError;
use crate::error::Error;

/// Errors surfaced to API clients.
///
/// Bodies are `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("odds not found")]
    NotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to retrieve odds")]
    Retrieval,

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Retrieval | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::Domain(e @ DomainError::InvalidInput { .. }) => Self::InvalidInput(e.to_string()),
            _ => Self::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
