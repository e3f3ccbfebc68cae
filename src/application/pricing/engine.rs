//! Heuristic re-pricing model.
//!
//! Converts the back price to an implied probability, widens it by a margin
//! chosen from liquidity and sport, converts back to odds, enforces a minimum
//! spread and scores confidence from liquidity, spread and data age.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use crate::domain::{DomainError, NormalizedQuote, OptimizationParameters, RepricedQuote};
use crate::port::inbound::pricing::Pricer;

/// Below this much combined liquidity the margin is widened.
const MARGIN_LIQUIDITY_THRESHOLD: i64 = 10_000;

/// Liquidity at which the confidence liquidity factor saturates.
const CONFIDENCE_LIQUIDITY_CAP: f64 = 20_000.0;

/// Minutes over which the freshness factor decays to its floor.
const FRESHNESS_WINDOW_MINUTES: f64 = 60.0;

/// Implied probability of decimal odds (`1 / odds`).
///
/// Callers must pass odds greater than zero.
#[must_use]
pub fn implied_probability(odds: Decimal) -> Decimal {
    Decimal::ONE / odds
}

/// Decimal odds for a probability.
///
/// Probabilities outside the open interval `(0, 1)` map to exactly `1`.
#[must_use]
pub fn probability_to_odds(probability: Decimal) -> Decimal {
    if probability <= Decimal::ZERO || probability >= Decimal::ONE {
        return Decimal::ONE;
    }
    Decimal::ONE / probability
}

/// Deterministic pricing model over fixed [`OptimizationParameters`].
///
/// Immutable once built and safe to share behind an `Arc`.
pub struct PricingEngine {
    params: OptimizationParameters,
    clock: Arc<dyn Clock>,
}

impl PricingEngine {
    /// Create an engine that reads the system clock.
    #[must_use]
    pub fn new(params: OptimizationParameters) -> Self {
        Self::with_clock(params, Arc::new(SystemClock))
    }

    /// Create an engine with an explicit time source.
    #[must_use]
    pub fn with_clock(params: OptimizationParameters, clock: Arc<dyn Clock>) -> Self {
        Self { params, clock }
    }

    #[must_use]
    pub const fn params(&self) -> &OptimizationParameters {
        &self.params
    }

    /// Margin for a quote, always within `[min_margin, max_margin]`.
    #[must_use]
    pub fn target_margin(&self, quote: &NormalizedQuote) -> Decimal {
        let threshold = Decimal::from(MARGIN_LIQUIDITY_THRESHOLD);
        let liquidity = quote.total_liquidity();

        let mut margin = self.params.min_margin();
        if liquidity < threshold {
            let ratio = (liquidity / threshold).max(Decimal::ZERO);
            margin += self.params.margin_range() * (Decimal::ONE - ratio);
        }

        margin *= sport_multiplier(&quote.sport);
        margin.clamp(self.params.min_margin(), self.params.max_margin())
    }

    /// Confidence score in `[0, 1]` for a quote priced with `spread` at `now`.
    ///
    /// `price` passes the published spread, after the minimum-spread floor.
    /// Earlier versions of the service scored the raw spread from before the
    /// floor, so floored quotes now score slightly lower.
    #[must_use]
    pub fn confidence(&self, quote: &NormalizedQuote, spread: Decimal, now: DateTime<Utc>) -> f64 {
        let liquidity = quote.total_liquidity().to_f64().unwrap_or(0.0);
        let liquidity_score = (liquidity / CONFIDENCE_LIQUIDITY_CAP).min(1.0);

        let spread_ratio = (spread / quote.back_price).to_f64().unwrap_or(0.0);
        let spread_score = (1.0 - spread_ratio * 10.0).max(0.0);

        // Quotes stamped in the future count as fresh.
        let age_minutes = ((now - quote.observed_at).num_milliseconds() as f64 / 60_000.0).max(0.0);
        let freshness_score = (1.0 - age_minutes / FRESHNESS_WINDOW_MINUTES).max(0.0);

        let confidence = self.params.target_confidence()
            * (0.7 + 0.3 * liquidity_score)
            * (0.8 + 0.2 * spread_score)
            * (0.9 + 0.1 * freshness_score);

        confidence.clamp(0.0, 1.0)
    }
}

impl Pricer for PricingEngine {
    fn price(&self, quote: &NormalizedQuote) -> Result<RepricedQuote, DomainError> {
        if quote.back_price <= Decimal::ONE {
            return Err(DomainError::InvalidInput {
                back_price: quote.back_price,
            });
        }

        let now = self.clock.now();
        let probability = implied_probability(quote.back_price);
        let margin = self.target_margin(quote);
        let half_margin = margin / dec!(2);

        let mut optimized_back = probability_to_odds(probability + half_margin);
        let mut optimized_lay = probability_to_odds(probability - half_margin);

        let min_spread = self.params.min_spread();
        let spread = optimized_back - optimized_lay;
        if spread < min_spread {
            let adjustment = (min_spread - spread) / dec!(2);
            optimized_back += adjustment;
            // Spread is exactly min_spread from here on.
            optimized_lay = optimized_back - min_spread;
        }

        let confidence = self.confidence(quote, optimized_back - optimized_lay, now);

        Ok(RepricedQuote {
            id: Uuid::new_v4(),
            event_id: quote.event_id.clone(),
            event_name: quote.event_name.clone(),
            sport: quote.sport.clone(),
            competition: quote.competition.clone(),
            market: quote.market.clone(),
            selection: quote.selection.clone(),
            optimized_back,
            optimized_lay,
            original_back: quote.back_price,
            original_lay: quote.lay_price,
            back_size: quote.back_size,
            lay_size: quote.lay_size,
            margin,
            confidence,
            observed_at: quote.observed_at,
            computed_at: now,
        })
    }
}

fn sport_multiplier(sport: &str) -> Decimal {
    if sport.eq_ignore_ascii_case("football") || sport.eq_ignore_ascii_case("soccer") {
        dec!(0.8)
    } else if sport.eq_ignore_ascii_case("tennis") {
        Decimal::ONE
    } else {
        dec!(1.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::clock::FixedClock;
    use crate::testkit::domain::{reference_time, QuoteBuilder};
    use chrono::Duration;

    fn engine_at(now: DateTime<Utc>) -> PricingEngine {
        PricingEngine::with_clock(
            OptimizationParameters::default(),
            Arc::new(FixedClock::new(now)),
        )
    }

    fn engine() -> PricingEngine {
        engine_at(reference_time())
    }

    #[test]
    fn test_reference_scenario() {
        let quote = QuoteBuilder::new().build();
        let repriced = engine().price(&quote).unwrap();

        assert_eq!(repriced.margin, dec!(0.02));
        assert!(repriced.optimized_back > repriced.optimized_lay);
        assert_eq!(repriced.spread(), dec!(0.05));
        assert!((repriced.confidence - 0.79152).abs() < 1e-9);
        assert_eq!(repriced.original_back, dec!(2.50));
        assert_eq!(repriced.original_lay, dec!(2.60));
        assert_eq!(repriced.observed_at, quote.observed_at);
        assert_eq!(repriced.computed_at, reference_time());
        assert_eq!(repriced.key(), quote.key());
    }

    #[test]
    fn test_rejects_back_price_at_or_below_one() {
        for back_price in [dec!(1), dec!(0.5), dec!(0), dec!(-2)] {
            let quote = QuoteBuilder::new().back_price(back_price).build();
            assert_eq!(
                engine().price(&quote),
                Err(DomainError::InvalidInput { back_price })
            );
        }
    }

    #[test]
    fn test_tolerates_missing_lay_price() {
        let quote = QuoteBuilder::new().lay_price(Decimal::ZERO).build();
        let repriced = engine().price(&quote).unwrap();

        assert_eq!(repriced.original_lay, Decimal::ZERO);
        assert!(repriced.spread() >= dec!(0.05));
    }

    #[test]
    fn test_target_margin_by_liquidity_and_sport() {
        let engine = engine();
        let cases = [
            ("football", dec!(0), dec!(0.08)),
            ("tennis", dec!(5000), dec!(0.06)),
            ("tennis", dec!(0), dec!(0.10)),
            ("cricket", dec!(18000), dec!(0.024)),
            ("cricket", dec!(0), dec!(0.10)),
            ("football", dec!(18000), dec!(0.02)),
            ("Soccer", dec!(18000), dec!(0.02)),
        ];

        for (sport, liquidity, expected) in cases {
            let quote = QuoteBuilder::new()
                .sport(sport)
                .back_size(liquidity)
                .lay_size(Decimal::ZERO)
                .build();
            assert_eq!(
                engine.target_margin(&quote),
                expected,
                "{sport} at {liquidity}"
            );
        }
    }

    #[test]
    fn test_negative_liquidity_is_treated_as_empty() {
        let quote = QuoteBuilder::new()
            .sport("tennis")
            .back_size(dec!(-500))
            .lay_size(Decimal::ZERO)
            .build();
        assert_eq!(engine().target_margin(&quote), dec!(0.10));
    }

    #[test]
    fn test_margin_does_not_decrease_as_liquidity_drops() {
        let engine = engine();
        for sport in ["football", "tennis", "darts"] {
            let mut previous = Decimal::ZERO;
            for liquidity in [50_000, 20_000, 10_000, 9_999, 7_500, 2_500, 1, 0] {
                let quote = QuoteBuilder::new()
                    .sport(sport)
                    .back_size(Decimal::from(liquidity))
                    .lay_size(Decimal::ZERO)
                    .build();
                let margin = engine.price(&quote).unwrap().margin;
                assert!(margin >= previous, "{sport}: {margin} < {previous}");
                previous = margin;
            }
        }
    }

    #[test]
    fn test_confidence_does_not_increase_with_age() {
        let quote = QuoteBuilder::new().build();
        let mut previous = f64::INFINITY;
        for minutes in [0, 1, 10, 30, 59, 60, 90, 600] {
            let now = reference_time() + Duration::minutes(minutes);
            let confidence = engine_at(now).price(&quote).unwrap().confidence;
            assert!(confidence <= previous, "{minutes}m: {confidence} > {previous}");
            previous = confidence;
        }
    }

    #[test]
    fn test_future_observation_counts_as_fresh() {
        let quote = QuoteBuilder::new().build();
        let fresh = engine().price(&quote).unwrap().confidence;
        let early = engine_at(reference_time() - Duration::minutes(5))
            .price(&quote)
            .unwrap()
            .confidence;
        assert!((fresh - early).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invariants_hold_for_valid_inputs() {
        let params = OptimizationParameters::default();
        let engine = engine_at(reference_time() + Duration::minutes(15));
        let back_prices = [
            dec!(1.01),
            dec!(1.25),
            dec!(2),
            dec!(3.75),
            dec!(10),
            dec!(101),
            dec!(1000),
        ];
        let liquidities = [dec!(0), dec!(250), dec!(9999.99), dec!(25000)];

        for back_price in back_prices {
            for liquidity in liquidities {
                for sport in ["soccer", "tennis", "golf"] {
                    let quote = QuoteBuilder::new()
                        .back_price(back_price)
                        .back_size(liquidity)
                        .sport(sport)
                        .build();
                    let repriced = engine.price(&quote).unwrap();

                    assert!(repriced.margin >= params.min_margin());
                    assert!(repriced.margin <= params.max_margin());
                    assert!(repriced.spread() >= params.min_spread());
                    assert!(repriced.optimized_back > repriced.optimized_lay);
                    assert!((0.0..=1.0).contains(&repriced.confidence));
                    assert_eq!(repriced.original_back, quote.back_price);
                    assert_eq!(repriced.original_lay, quote.lay_price);
                }
            }
        }
    }

    #[test]
    fn test_probability_to_odds_safeguard() {
        for probability in [dec!(0), dec!(-0.1), dec!(1), dec!(1.5)] {
            assert_eq!(probability_to_odds(probability), Decimal::ONE);
        }
        assert_eq!(probability_to_odds(dec!(0.4)), dec!(2.5));
    }

    #[test]
    fn test_probability_round_trip() {
        for odds in [dec!(1.01), dec!(1.91), dec!(2.5), dec!(3), dec!(7.3), dec!(51)] {
            let back = probability_to_odds(implied_probability(odds));
            assert!((back - odds).abs() < dec!(0.000000001), "{odds} -> {back}");
        }
    }

    #[test]
    fn test_batch_drops_invalid_items_and_keeps_order() {
        let quotes = vec![
            QuoteBuilder::new().selection("Home").build(),
            QuoteBuilder::new().selection("Draw").back_price(dec!(0.5)).build(),
            QuoteBuilder::new().selection("Away").build(),
        ];

        let batch = engine().price_batch(&quotes);

        assert_eq!(batch.priced.len(), 2);
        assert_eq!(batch.priced[0].selection, "Home");
        assert_eq!(batch.priced[1].selection, "Away");
        assert_eq!(batch.priced[0].event_id, quotes[0].event_id);
        assert_eq!(batch.rejected_count(), 1);
        assert_eq!(batch.rejected[0].index, 1);
        assert_eq!(batch.rejected[0].key, quotes[1].key());
    }

    #[test]
    fn test_each_output_gets_fresh_identity() {
        let quote = QuoteBuilder::new().build();
        let engine = engine();
        let first = engine.price(&quote).unwrap();
        let second = engine.price(&quote).unwrap();
        assert_ne!(first.id, second.id);
        assert_ne!(first.id, quote.id);
    }

    #[test]
    fn test_liquidity_at_decimal_range_is_priced() {
        let quote = QuoteBuilder::new()
            .back_size(Decimal::MAX)
            .lay_size(dec!(1))
            .build();

        let repriced = engine().price(&quote).unwrap();
        assert_eq!(repriced.margin, dec!(0.02));
        assert!(repriced.confidence <= 1.0);

        let priced = engine().price_batch(&[quote]);
        assert_eq!(priced.priced.len(), 1);
    }
}
