//! Builders for quotes and stream envelopes used across tests.
//!
//! The default [`QuoteBuilder`] produces the reference football quote:
//! back 2.50, lay 2.60, 10,000 / 8,000 liquidity, observed at
//! [`reference_time`].

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::domain::{NormalizedQuote, QuoteBatch, RepricedQuote};

/// Fixed instant shared by builders and clocks (2024-05-01T12:00:00Z).
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Fluent builder for [`NormalizedQuote`].
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    quote: NormalizedQuote,
}

impl QuoteBuilder {
    pub fn new() -> Self {
        Self {
            quote: NormalizedQuote {
                id: Uuid::new_v4(),
                event_id: "event-123".to_string(),
                event_name: "Team A vs Team B".to_string(),
                sport: "football".to_string(),
                competition: "Premier League".to_string(),
                market: "match_winner".to_string(),
                selection: "Team A".to_string(),
                back_price: dec!(2.50),
                lay_price: dec!(2.60),
                back_size: dec!(10000),
                lay_size: dec!(8000),
                observed_at: reference_time(),
                normalized_at: None,
            },
        }
    }

    pub fn event(mut self, event_id: &str) -> Self {
        self.quote.event_id = event_id.to_string();
        self
    }

    pub fn market(mut self, market: &str) -> Self {
        self.quote.market = market.to_string();
        self
    }

    pub fn selection(mut self, selection: &str) -> Self {
        self.quote.selection = selection.to_string();
        self
    }

    pub fn sport(mut self, sport: &str) -> Self {
        self.quote.sport = sport.to_string();
        self
    }

    pub fn back_price(mut self, price: Decimal) -> Self {
        self.quote.back_price = price;
        self
    }

    pub fn lay_price(mut self, price: Decimal) -> Self {
        self.quote.lay_price = price;
        self
    }

    pub fn back_size(mut self, size: Decimal) -> Self {
        self.quote.back_size = size;
        self
    }

    pub fn lay_size(mut self, size: Decimal) -> Self {
        self.quote.lay_size = size;
        self
    }

    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.quote.observed_at = at;
        self
    }

    pub fn build(self) -> NormalizedQuote {
        self.quote
    }
}

impl Default for QuoteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap quotes in a stream envelope.
pub fn batch(batch_id: &str, quotes: Vec<NormalizedQuote>) -> QuoteBatch {
    QuoteBatch {
        odds_data: quotes,
        timestamp: reference_time(),
        batch_id: batch_id.to_string(),
    }
}

/// Encode an envelope the way the upstream producer does.
pub fn encode(batch: &QuoteBatch) -> Vec<u8> {
    serde_json::to_vec(batch).unwrap_or_default()
}

/// Field-wise equality for quotes that went through JSON, with a tolerance on
/// the floating-point confidence.
pub fn same_quote(a: &RepricedQuote, b: &RepricedQuote) -> bool {
    let mut b_adjusted = b.clone();
    b_adjusted.confidence = a.confidence;
    *a == b_adjusted && (a.confidence - b.confidence).abs() < 1e-12
}
