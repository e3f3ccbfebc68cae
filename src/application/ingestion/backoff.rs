//! Exponential backoff for consecutive stream pull failures.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Backoff tuning, read from `[stream.backoff]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound on the base delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Growth factor applied after each consecutive failure.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

const fn default_initial_delay_ms() -> u64 {
    100
}

const fn default_max_delay_ms() -> u64 {
    10_000
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Mutable backoff state for one consumer.
#[derive(Debug)]
pub struct Backoff {
    policy: BackoffPolicy,
    current_delay_ms: u64,
    consecutive_failures: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current_delay_ms: policy.initial_delay_ms.min(policy.max_delay_ms),
            policy,
            consecutive_failures: 0,
        }
    }

    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a failure and return how long to wait before the next pull.
    ///
    /// The base delay grows geometrically up to `max_delay_ms`; up to 20%
    /// random jitter is added on top.
    pub fn next_delay(&mut self) -> Duration {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        let base_ms = self.current_delay_ms;
        let delay = Duration::from_millis(base_ms + jitter_ms(base_ms));

        let grown = (base_ms as f64 * self.policy.backoff_multiplier) as u64;
        self.current_delay_ms = grown.min(self.policy.max_delay_ms);

        delay
    }

    /// Forget previous failures after a successful pull.
    pub fn reset(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay_ms = self.policy.initial_delay_ms.min(self.policy.max_delay_ms);
    }
}

fn jitter_ms(base_ms: u64) -> u64 {
    let range = base_ms / 5;
    if range == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=range)
}
