//! Quote records flowing through the pipeline.
//!
//! [`NormalizedQuote`] arrives from the upstream normalizer; [`RepricedQuote`]
//! is what the pricing engine produces and the cache stores. Decimal fields
//! serialize as exact strings and timestamps as RFC 3339 instants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::key::QuoteKey;

/// A cleaned price/liquidity observation for one selection of one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuote {
    /// Upstream record identity.
    #[serde(default)]
    pub id: Uuid,
    pub event_id: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub competition: String,
    pub market: String,
    pub selection: String,
    /// Decimal back odds.
    pub back_price: Decimal,
    /// Decimal lay odds; zero when the market has no lay side.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub lay_price: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub back_size: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub lay_size: Decimal,
    /// When the underlying market was observed.
    #[serde(rename = "timestamp")]
    pub observed_at: DateTime<Utc>,
    /// When the upstream normalizer emitted the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_at: Option<DateTime<Utc>>,
}

impl NormalizedQuote {
    /// Cache identity of this quote.
    #[must_use]
    pub fn key(&self) -> QuoteKey {
        QuoteKey::new(&self.event_id, &self.market, &self.selection)
    }

    /// Combined back and lay liquidity, saturating at the decimal range.
    #[must_use]
    pub fn total_liquidity(&self) -> Decimal {
        self.back_size.saturating_add(self.lay_size)
    }

    /// Whether an independent lay price is available.
    #[must_use]
    pub fn has_lay_price(&self) -> bool {
        self.lay_price > Decimal::ONE
    }
}

/// A quote re-priced to carry the target margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricedQuote {
    /// Fresh identity minted for every output record.
    pub id: Uuid,
    pub event_id: String,
    pub event_name: String,
    pub sport: String,
    pub competition: String,
    pub market: String,
    pub selection: String,
    pub optimized_back: Decimal,
    pub optimized_lay: Decimal,
    pub original_back: Decimal,
    pub original_lay: Decimal,
    pub back_size: Decimal,
    pub lay_size: Decimal,
    /// Margin injected between the back and lay probabilities.
    pub margin: Decimal,
    /// Trust score in `[0, 1]`.
    pub confidence: f64,
    /// Observation time carried over from the input.
    #[serde(rename = "timestamp")]
    pub observed_at: DateTime<Utc>,
    /// Wall-clock time of the transformation.
    #[serde(rename = "optimized_at")]
    pub computed_at: DateTime<Utc>,
}

impl RepricedQuote {
    /// Cache identity of this quote.
    #[must_use]
    pub fn key(&self) -> QuoteKey {
        QuoteKey::new(&self.event_id, &self.market, &self.selection)
    }

    /// Distance between the optimized back and lay odds.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.optimized_back - self.optimized_lay
    }
}

fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const UPSTREAM_JSON: &str = r#"{
        "id": "6f1c1c8e-2f55-4c39-8d8f-2b7b3f0f3a11",
        "event_id": "event-123",
        "event_name": "Team A vs Team B",
        "sport": "football",
        "competition": "Premier League",
        "market": "match_winner",
        "selection": "Team A",
        "back_price": "2.50",
        "lay_price": null,
        "back_size": 10000,
        "lay_size": "8000",
        "timestamp": "2024-05-01T12:00:00Z",
        "normalized_at": "2024-05-01T12:00:01Z"
    }"#;

    #[test]
    fn parses_upstream_record_with_missing_lay_price() {
        let quote: NormalizedQuote = serde_json::from_str(UPSTREAM_JSON).unwrap();

        assert_eq!(quote.back_price, dec!(2.50));
        assert_eq!(quote.lay_price, Decimal::ZERO);
        assert!(!quote.has_lay_price());
        assert_eq!(quote.total_liquidity(), dec!(18000));
        assert_eq!(quote.key(), QuoteKey::new("event-123", "match_winner", "Team A"));
    }

    #[test]
    fn repriced_quote_uses_wire_field_names() {
        let quote: NormalizedQuote = serde_json::from_str(UPSTREAM_JSON).unwrap();
        let repriced = RepricedQuote {
            id: Uuid::nil(),
            event_id: quote.event_id.clone(),
            event_name: quote.event_name.clone(),
            sport: quote.sport.clone(),
            competition: quote.competition.clone(),
            market: quote.market.clone(),
            selection: quote.selection.clone(),
            optimized_back: dec!(2.464),
            optimized_lay: dec!(2.414),
            original_back: quote.back_price,
            original_lay: quote.lay_price,
            back_size: quote.back_size,
            lay_size: quote.lay_size,
            margin: dec!(0.02),
            confidence: 0.8,
            observed_at: quote.observed_at,
            computed_at: quote.observed_at,
        };

        let json = serde_json::to_value(&repriced).unwrap();
        assert_eq!(json["optimized_back"], "2.464");
        assert_eq!(json["margin"], "0.02");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
        assert!(json.get("optimized_at").is_some());
        assert_eq!(repriced.spread(), dec!(0.050));
    }
}
