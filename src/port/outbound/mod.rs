//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the key-value cache backend and the message
//! stream the ingestion loop consumes.

pub mod store;
pub mod stream;

pub use store::KeyValueStore;
pub use stream::{QuoteStream, StreamMessage};
