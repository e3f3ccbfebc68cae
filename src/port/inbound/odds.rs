//! Read and submit use cases behind the HTTP surface.

use async_trait::async_trait;

use crate::domain::{NormalizedQuote, QuoteKey, RepricedQuote};
use crate::error::Result;

/// Query side of the optimizer.
///
/// Reads are cache-aside: a miss is reported as absence and never triggers a
/// recompute. Only [`submit`](Self::submit) and the ingestion loop populate the
/// cache.
#[async_trait]
pub trait OddsQuery: Send + Sync {
    /// Point lookup. Store failures degrade to `None`.
    async fn lookup(&self, key: &QuoteKey) -> Option<RepricedQuote>;

    /// Every cached quote for one event. Store failures are surfaced.
    async fn lookup_by_event(&self, event_id: &str) -> Result<Vec<RepricedQuote>>;

    /// Price one quote on demand and write it through to the cache.
    ///
    /// # Errors
    ///
    /// Returns the pricing error for invalid input. Cache write failures are
    /// logged and do not fail the call.
    async fn submit(&self, quote: &NormalizedQuote) -> Result<RepricedQuote>;

    /// Whether the backing cache answers.
    async fn ready(&self) -> bool;
}
