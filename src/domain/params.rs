//! Optimization parameters shared by every pricing call.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::DomainError;

/// Immutable re-pricing parameters.
///
/// Built once at startup and shared by reference. Use [`try_new`](Self::try_new)
/// to construct a validated instance.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationParameters {
    min_margin: Decimal,
    max_margin: Decimal,
    min_spread: Decimal,
    target_confidence: f64,
}

impl OptimizationParameters {
    /// Create a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] unless
    /// `0 < min_margin < max_margin`, `min_spread > 0` and
    /// `0 < target_confidence <= 1`.
    pub fn try_new(
        min_margin: Decimal,
        max_margin: Decimal,
        min_spread: Decimal,
        target_confidence: f64,
    ) -> Result<Self, DomainError> {
        if min_margin <= Decimal::ZERO {
            return Err(DomainError::InvalidParameter {
                field: "min_margin",
                reason: "must be greater than 0".to_string(),
            });
        }
        if max_margin <= min_margin {
            return Err(DomainError::InvalidParameter {
                field: "max_margin",
                reason: format!("must be greater than min_margin ({min_margin})"),
            });
        }
        if min_spread <= Decimal::ZERO {
            return Err(DomainError::InvalidParameter {
                field: "min_spread",
                reason: "must be greater than 0".to_string(),
            });
        }
        if !(target_confidence > 0.0 && target_confidence <= 1.0) {
            return Err(DomainError::InvalidParameter {
                field: "target_confidence",
                reason: "must be in (0, 1]".to_string(),
            });
        }

        Ok(Self {
            min_margin,
            max_margin,
            min_spread,
            target_confidence,
        })
    }

    #[must_use]
    pub const fn min_margin(&self) -> Decimal {
        self.min_margin
    }

    #[must_use]
    pub const fn max_margin(&self) -> Decimal {
        self.max_margin
    }

    #[must_use]
    pub const fn min_spread(&self) -> Decimal {
        self.min_spread
    }

    #[must_use]
    pub const fn target_confidence(&self) -> f64 {
        self.target_confidence
    }

    /// Width of the margin band (`max_margin - min_margin`).
    #[must_use]
    pub fn margin_range(&self) -> Decimal {
        self.max_margin - self.min_margin
    }
}

impl Default for OptimizationParameters {
    fn default() -> Self {
        Self {
            min_margin: dec!(0.02),
            max_margin: dec!(0.10),
            min_spread: dec!(0.05),
            target_confidence: 0.85,
        }
    }
}
