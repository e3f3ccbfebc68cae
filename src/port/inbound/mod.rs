//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`pricing`]: the re-pricing model
//! - [`odds`]: read and submit use cases served over HTTP

pub mod odds;
pub mod pricing;

pub use odds::OddsQuery;
pub use pricing::{PricedBatch, Pricer, RejectedQuote};
