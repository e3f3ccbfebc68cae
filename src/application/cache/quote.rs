//! Typed quote cache.
//!
//! Values are JSON-encoded [`RepricedQuote`]s stored under
//! [`QuoteKey::cache_key`]. Every write carries the configured TTL and
//! overwrites the previous value (last write wins). Undecodable payloads are
//! treated as absent.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::key::event_prefix;
use crate::domain::{QuoteKey, RepricedQuote};
use crate::error::{Error, Result};
use crate::port::outbound::KeyValueStore;

/// Outcome of a cache liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHealth {
    Ok,
    Unavailable,
}

impl CacheHealth {
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Cache-aside store of re-priced quotes.
pub struct QuoteCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl QuoteCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Store one quote, overwriting any previous value for its key.
    pub async fn put(&self, quote: &RepricedQuote, cancel: &CancellationToken) -> Result<()> {
        ensure_active(cancel)?;
        let key = quote.key().cache_key();
        let payload = serde_json::to_string(quote)?;

        until_cancelled(cancel, self.store.set(&key, payload, self.ttl)).await?;
        debug!(key = %key, "Cached quote");
        Ok(())
    }

    /// Point lookup. `None` when absent, expired or undecodable.
    ///
    /// # Errors
    ///
    /// Transport failures and cancellation are returned as errors.
    pub async fn get(
        &self,
        key: &QuoteKey,
        cancel: &CancellationToken,
    ) -> Result<Option<RepricedQuote>> {
        ensure_active(cancel)?;
        let cache_key = key.cache_key();
        let raw = until_cancelled(cancel, self.store.get(&cache_key)).await?;

        Ok(raw.and_then(|payload| decode(&cache_key, &payload)))
    }

    /// Store many quotes in one round trip. Returns how many were written.
    ///
    /// Items that fail to encode are logged and skipped; an empty input never
    /// reaches the store.
    pub async fn put_batch(
        &self,
        quotes: &[RepricedQuote],
        cancel: &CancellationToken,
    ) -> Result<usize> {
        ensure_active(cancel)?;
        if quotes.is_empty() {
            return Ok(0);
        }

        let mut entries = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let key = quote.key().cache_key();
            match serde_json::to_string(quote) {
                Ok(payload) => entries.push((key, payload)),
                Err(error) => warn!(key = %key, error = %error, "Skipping unencodable quote"),
            }
        }
        if entries.is_empty() {
            return Ok(0);
        }

        let count = entries.len();
        until_cancelled(cancel, self.store.set_many(entries, self.ttl)).await?;
        debug!(count, "Cached quote batch");
        Ok(count)
    }

    /// Every live quote for one event.
    ///
    /// Keys that vanish between scan and fetch are skipped silently and
    /// undecodable entries are logged and skipped. Order follows the scan.
    pub async fn get_by_event(
        &self,
        event_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RepricedQuote>> {
        ensure_active(cancel)?;
        let prefix = event_prefix(event_id);
        let keys = until_cancelled(cancel, self.store.scan_prefix(&prefix)).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values = until_cancelled(cancel, self.store.get_many(&keys)).await?;
        let quotes: Vec<RepricedQuote> = keys
            .iter()
            .zip(values)
            .filter_map(|(key, value)| value.and_then(|payload| decode(key, &payload)))
            .collect();

        debug!(event_id = %event_id, scanned = keys.len(), found = quotes.len(), "Event lookup");
        Ok(quotes)
    }

    /// Round-trip liveness probe.
    pub async fn health(&self, cancel: &CancellationToken) -> CacheHealth {
        let result = match ensure_active(cancel) {
            Ok(()) => until_cancelled(cancel, self.store.ping()).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => CacheHealth::Ok,
            Err(error) => {
                warn!(backend = self.store.backend_name(), error = %error, "Cache health check failed");
                CacheHealth::Unavailable
            }
        }
    }
}

fn decode(key: &str, payload: &str) -> Option<RepricedQuote> {
    match serde_json::from_str(payload) {
        Ok(quote) => Some(quote),
        Err(error) => {
            warn!(key = %key, error = %error, "Discarding undecodable cache entry");
            None
        }
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}

/// Race a store call against shutdown.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        result = call => result,
    }
}
