//! Transport-agnostic domain types.
//!
//! - [`quote`] - input and output quote records
//! - [`params`] - validated optimization parameters
//! - [`key`] - cache key construction and escaping
//! - [`batch`] - stream envelope
//! - [`error`] - domain validation errors

pub mod batch;
pub mod error;
pub mod key;
pub mod params;
pub mod quote;

pub use batch::QuoteBatch;
pub use error::DomainError;
pub use key::QuoteKey;
pub use params::OptimizationParameters;
pub use quote::{NormalizedQuote, RepricedQuote};
