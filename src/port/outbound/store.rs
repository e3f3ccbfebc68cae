//! Key-value storage port backing the quote cache.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Minimal string key-value contract with per-entry expiry.
///
/// Keys and values are opaque strings; encoding lives in the application
/// layer. Implementations must be safe to share across tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value. `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with a time-to-live, overwriting any previous value.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Store several entries in one round trip where the backend supports it.
    async fn set_many(&self, entries: Vec<(String, String)>, ttl: Duration) -> Result<()>;

    /// List every live key starting with `prefix`.
    ///
    /// `prefix` is matched literally.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Fetch several values, positionally aligned with `keys`.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// Round-trip liveness check.
    async fn ping(&self) -> Result<()>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}
