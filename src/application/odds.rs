//! Read Orchestrator: cache-aside lookups and on-demand submission.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::cache::QuoteCache;
use crate::domain::{NormalizedQuote, QuoteKey, RepricedQuote};
use crate::error::Result;
use crate::port::inbound::{OddsQuery, Pricer};

/// Serves external queries from the cache and prices submitted quotes.
///
/// Reads never recompute on a miss; only submission and the ingestion loop
/// populate the cache.
pub struct OddsService {
    pricer: Arc<dyn Pricer>,
    cache: Arc<QuoteCache>,
    cancel: CancellationToken,
}

impl OddsService {
    /// `cancel` is the process shutdown token; it bounds every cache call.
    #[must_use]
    pub fn new(pricer: Arc<dyn Pricer>, cache: Arc<QuoteCache>, cancel: CancellationToken) -> Self {
        Self {
            pricer,
            cache,
            cancel,
        }
    }

    /// Price a batch and write the survivors through to the cache.
    ///
    /// Invalid items are dropped; a cache failure is logged and the priced
    /// quotes are still returned.
    pub async fn submit_batch(&self, quotes: &[NormalizedQuote]) -> Vec<RepricedQuote> {
        let priced = self.pricer.price_batch(quotes).into_priced();

        if let Err(e) = self.cache.put_batch(&priced, &self.cancel).await {
            error!(count = priced.len(), error = %e, "Failed to cache submitted batch");
        }
        priced
    }
}

#[async_trait]
impl OddsQuery for OddsService {
    async fn lookup(&self, key: &QuoteKey) -> Option<RepricedQuote> {
        match self.cache.get(key, &self.cancel).await {
            Ok(found) => {
                if found.is_none() {
                    debug!(key = %key, "Odds not yet available");
                }
                found
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache lookup failed");
                None
            }
        }
    }

    async fn lookup_by_event(&self, event_id: &str) -> Result<Vec<RepricedQuote>> {
        self.cache.get_by_event(event_id, &self.cancel).await
    }

    async fn submit(&self, quote: &NormalizedQuote) -> Result<RepricedQuote> {
        let repriced = self.pricer.price(quote)?;

        if let Err(e) = self.cache.put(&repriced, &self.cancel).await {
            error!(key = %repriced.key(), error = %e, "Failed to cache submitted quote");
        }
        Ok(repriced)
    }

    async fn ready(&self) -> bool {
        self.cache.health(&self.cancel).await.is_ok()
    }
}
