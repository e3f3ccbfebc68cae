//! Outbound adapters (driven side).

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
