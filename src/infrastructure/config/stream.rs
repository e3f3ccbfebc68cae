//! Normalized-odds stream settings.

use serde::{Deserialize, Serialize};

use crate::application::ingestion::BackoffPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Run the ingestion loop. When false the service only serves reads.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Stream server URL. Falls back to `redis.url` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_key")]
    pub key: String,

    #[serde(default = "default_group")]
    pub group: String,

    #[serde(default = "default_consumer")]
    pub consumer: String,

    /// How long one read waits for new entries (milliseconds).
    #[serde(default = "default_block_ms")]
    pub block_ms: u64,

    /// Maximum entries fetched per read.
    #[serde(default = "default_read_count")]
    pub read_count: usize,

    /// Backoff after consecutive read failures.
    #[serde(default)]
    pub backoff: BackoffPolicy,
}

const fn default_enabled() -> bool {
    true
}

fn default_key() -> String {
    "normalized_odds".to_string()
}

fn default_group() -> String {
    "odds-optimizer".to_string()
}

fn default_consumer() -> String {
    "odds-optimizer-1".to_string()
}

const fn default_block_ms() -> u64 {
    5000
}

const fn default_read_count() -> usize {
    10
}

impl StreamConfig {
    /// The URL to consume from, given the cache URL as fallback.
    #[must_use]
    pub fn effective_url<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.url.as_deref().unwrap_or(fallback)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: None,
            key: default_key(),
            group: default_group(),
            consumer: default_consumer(),
            block_ms: default_block_ms(),
            read_count: default_read_count(),
            backoff: BackoffPolicy::default(),
        }
    }
}
