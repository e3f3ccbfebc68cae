//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all service settings.
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to its defaults. Connection endpoints can be overridden from
//! the environment:
//!
//! | Variable | Overrides |
//! |---|---|
//! | `ODDS_OPTIMIZER_REDIS_URL` | `redis.url` |
//! | `ODDS_OPTIMIZER_STREAM_URL` | `stream.url` |
//! | `ODDS_OPTIMIZER_BIND_ADDR` | `server.bind_addr` |
//!
//! # Example
//!
//! ```no_run
//! use odds_optimizer::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::optimization::OptimizationConfig;
use super::redis::RedisConfig;
use super::server::ServerConfig;
use super::stream::StreamConfig;
use crate::domain::OptimizationParameters;
use crate::error::{ConfigError, Result};

pub const REDIS_URL_ENV: &str = "ODDS_OPTIMIZER_REDIS_URL";
pub const STREAM_URL_ENV: &str = "ODDS_OPTIMIZER_STREAM_URL";
pub const BIND_ADDR_ENV: &str = "ODDS_OPTIMIZER_BIND_ADDR";

/// Main service configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Built once at startup and passed by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP read API listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Cache backend.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Normalized-odds stream consumer.
    #[serde(default)]
    pub stream: StreamConfig,

    /// Pricing parameters.
    #[serde(default)]
    pub optimization: OptimizationConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config = Self::parse_unvalidated(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content and apply environment overrides without validating.
    ///
    /// Used by diagnostics that report every problem instead of the first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML content is malformed.
    pub fn parse_unvalidated(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Apply endpoint overrides from `lookup`, typically the process environment.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(REDIS_URL_ENV) {
            self.redis.url = url;
        }
        if let Some(url) = value(STREAM_URL_ENV) {
            self.stream.url = Some(url);
        }
        if let Some(addr) = value(BIND_ADDR_ENV) {
            self.server.bind_addr = addr;
        }
    }

    /// Validated pricing parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range parameters.
    pub fn optimization_parameters(&self) -> Result<OptimizationParameters> {
        Ok(self.optimization.parameters()?)
    }

    /// URL the stream consumer connects to.
    #[must_use]
    pub fn stream_url(&self) -> &str {
        self.stream.effective_url(&self.redis.url)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        self.validate_server()?;
        self.validate_cache()?;
        if self.stream.enabled {
            self.validate_stream()?;
        }
        self.optimization.parameters()?;
        self.validate_logging()?;
        Ok(())
    }

    /// Check the HTTP listener settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparseable bind address.
    pub fn validate_server(&self) -> std::result::Result<(), ConfigError> {
        if self.server.socket_addr().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "bind_addr",
                reason: format!("'{}' is not a host:port address", self.server.bind_addr),
            });
        }
        Ok(())
    }

    /// Check the cache backend settings.
    ///
    /// # Errors
    ///
    /// Returns the first invalid cache field.
    pub fn validate_cache(&self) -> std::result::Result<(), ConfigError> {
        if self.redis.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "redis.url" });
        }
        if self.redis.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ttl_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.redis.scan_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan_count",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Check the stream consumer settings.
    ///
    /// # Errors
    ///
    /// Returns the first invalid stream field.
    pub fn validate_stream(&self) -> std::result::Result<(), ConfigError> {
        if self.stream.key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "stream.key" });
        }
        if self.stream.group.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "stream.group",
            });
        }
        if self.stream.consumer.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "stream.consumer",
            });
        }
        if self.stream.read_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "read_count",
                reason: "must be greater than 0".to_string(),
            });
        }

        let backoff = &self.stream.backoff;
        if backoff.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if backoff.max_delay_ms < backoff.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            });
        }
        if !(backoff.backoff_multiplier >= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            });
        }
        Ok(())
    }

    /// Check the logging settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown log format.
    pub fn validate_logging(&self) -> std::result::Result<(), ConfigError> {
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("unknown log format '{}'", self.logging.format),
            });
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Fails only if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
