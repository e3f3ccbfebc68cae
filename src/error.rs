use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Key-value store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to connect to {backend}: {reason}")]
    Connection {
        backend: &'static str,
        reason: String,
    },

    #[error("{backend} command {command} failed: {reason}")]
    Command {
        backend: &'static str,
        command: &'static str,
        reason: String,
    },
}

/// Message stream failures.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("failed to connect to stream {stream}: {reason}")]
    Connection { stream: String, reason: String },

    #[error("failed to read from stream {stream}: {reason}")]
    Read { stream: String, reason: String },

    #[error("failed to acknowledge message {message_id} on {stream}: {reason}")]
    Acknowledge {
        stream: String,
        message_id: String,
        reason: String,
    },

    #[error("message {message_id} is malformed: {reason}")]
    Malformed { message_id: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled by shutdown")]
    Cancelled,

    #[error("health check failed: {0}")]
    HealthCheck(String),

    #[error("ingestion task failed: {0}")]
    Ingestion(String),
}

impl Error {
    /// True when the error was caused by the shutdown signal rather than a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
