//! Runtime lifecycle and configuration health.

pub mod health;
pub mod runtime;

pub use health::{health_check, HealthReport, HealthStatus};
pub use runtime::{run_until_shutdown, run_with_shutdown, RunOptions};
