//! Pricing port.
//!
//! The heuristic [`PricingEngine`](crate::application::pricing::PricingEngine)
//! is the only implementation today; anything that maps a normalized quote to
//! a re-priced one can sit behind [`Pricer`].

use tracing::{debug, warn};

use crate::domain::{DomainError, NormalizedQuote, QuoteKey, RepricedQuote};

/// A quote dropped from a batch, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedQuote {
    /// Position in the input batch.
    pub index: usize,
    pub key: QuoteKey,
    pub error: DomainError,
}

/// Outcome of pricing a batch: survivors in input order plus the rejects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricedBatch {
    pub priced: Vec<RepricedQuote>,
    pub rejected: Vec<RejectedQuote>,
}

impl PricedBatch {
    #[must_use]
    pub fn into_priced(self) -> Vec<RepricedQuote> {
        self.priced
    }

    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Re-pricing model.
pub trait Pricer: Send + Sync {
    /// Re-price a single quote.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidInput`] when the quote cannot be priced.
    fn price(&self, quote: &NormalizedQuote) -> Result<RepricedQuote, DomainError>;

    /// Re-price a batch item by item.
    ///
    /// Never fails as a whole: rejected items are logged and reported in
    /// [`PricedBatch::rejected`], survivors keep their input order.
    fn price_batch(&self, quotes: &[NormalizedQuote]) -> PricedBatch {
        let mut batch = PricedBatch {
            priced: Vec::with_capacity(quotes.len()),
            rejected: Vec::new(),
        };

        for (index, quote) in quotes.iter().enumerate() {
            match self.price(quote) {
                Ok(repriced) => batch.priced.push(repriced),
                Err(error) => {
                    warn!(
                        event_id = %quote.event_id,
                        market = %quote.market,
                        selection = %quote.selection,
                        error = %error,
                        "Dropping quote from batch"
                    );
                    batch.rejected.push(RejectedQuote {
                        index,
                        key: quote.key(),
                        error,
                    });
                }
            }
        }

        debug!(
            input_count = quotes.len(),
            output_count = batch.priced.len(),
            "Batch priced"
        );
        batch
    }
}
