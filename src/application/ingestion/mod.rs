//! Ingestion Loop: stream → pricing → cache → acknowledge.
//!
//! - [`worker::IngestionLoop`]: the consume-transform-commit loop
//! - [`backoff`]: pull-failure backoff

pub mod backoff;
pub mod worker;

pub use backoff::{Backoff, BackoffPolicy};
pub use worker::{IngestionLoop, IngestionReport, StopReason};
