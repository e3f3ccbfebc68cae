//! Pricing Engine: deterministic margin injection and confidence scoring.

mod clock;
mod engine;

pub use clock::{Clock, SystemClock};
pub use engine::{implied_probability, probability_to_odds, PricingEngine};
