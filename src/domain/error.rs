//! Domain validation errors.
//!
//! Raised when a quote or a parameter set violates a pricing invariant.
//!
//! # Examples
//!
//! ```
//! use odds_optimizer::domain::error::DomainError;
//! use odds_optimizer::domain::params::OptimizationParameters;
//! use rust_decimal_macros::dec;
//!
//! // max_margin must exceed min_margin
//! let result = OptimizationParameters::try_new(dec!(0.10), dec!(0.02), dec!(0.05), 0.85);
//!
//! assert!(matches!(
//!     result,
//!     Err(DomainError::InvalidParameter { field: "max_margin", .. })
//! ));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Back price cannot be converted into a probability.
    ///
    /// Decimal odds at or below 1 imply a probability of 100% or more.
    #[error("invalid back price: {back_price}")]
    InvalidInput {
        /// The rejected back price.
        back_price: Decimal,
    },

    /// An optimization parameter is outside its allowed range.
    #[error("invalid optimization parameter {field}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        field: &'static str,
        /// Human-readable constraint that was broken.
        reason: String,
    },
}
