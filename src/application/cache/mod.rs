//! Cache Store: TTL-bounded storage of re-priced quotes over a
//! [`KeyValueStore`](crate::port::outbound::KeyValueStore).
//!
//! - [`quote::QuoteCache`]: typed get/put/batch/prefix-scan with cancellation

pub mod quote;

pub use quote::{CacheHealth, QuoteCache};
