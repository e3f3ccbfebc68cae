//! Canonical test configurations.

use crate::application::ingestion::BackoffPolicy;
use crate::infrastructure::config::Config;

/// Backoff with 1ms delays so retry paths run without waiting.
pub fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy {
        initial_delay_ms: 1,
        max_delay_ms: 1,
        backoff_multiplier: 1.0,
    }
}

/// Default config bound to an ephemeral loopback port with fast backoff
/// and a short shutdown timeout.
pub fn service() -> Config {
    let mut config = Config::default();
    config.server.bind_addr = "127.0.0.1:0".to_string();
    config.server.shutdown_timeout_secs = 2;
    config.stream.backoff = fast_backoff();
    config
}
