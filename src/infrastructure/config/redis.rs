//! Cache backend settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Lifetime of every cached quote.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// `SCAN` page size for event lookups.
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
}

fn default_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

const fn default_ttl_secs() -> u64 {
    900 // 15 minutes
}

const fn default_scan_count() -> usize {
    100
}

impl RedisConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            ttl_secs: default_ttl_secs(),
            scan_count: default_scan_count(),
        }
    }
}
