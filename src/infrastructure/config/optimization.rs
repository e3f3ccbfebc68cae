//! Pricing parameters as read from `[optimization]`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, OptimizationParameters};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    #[serde(default = "default_min_margin")]
    pub min_margin: Decimal,

    #[serde(default = "default_max_margin")]
    pub max_margin: Decimal,

    #[serde(default = "default_min_spread")]
    pub min_spread: Decimal,

    #[serde(default = "default_target_confidence")]
    pub target_confidence: f64,
}

fn default_min_margin() -> Decimal {
    dec!(0.02)
}

fn default_max_margin() -> Decimal {
    dec!(0.10)
}

fn default_min_spread() -> Decimal {
    dec!(0.05)
}

const fn default_target_confidence() -> f64 {
    0.85
}

impl OptimizationConfig {
    /// Validate into domain parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn parameters(&self) -> Result<OptimizationParameters, ConfigError> {
        OptimizationParameters::try_new(
            self.min_margin,
            self.max_margin,
            self.min_spread,
            self.target_confidence,
        )
        .map_err(|e| match e {
            DomainError::InvalidParameter { field, reason } => {
                ConfigError::InvalidValue { field, reason }
            }
            other => ConfigError::InvalidValue {
                field: "optimization",
                reason: other.to_string(),
            },
        })
    }
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            min_margin: default_min_margin(),
            max_margin: default_max_margin(),
            min_spread: default_min_spread(),
            target_confidence: default_target_confidence(),
        }
    }
}
