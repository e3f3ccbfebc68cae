//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`stream`] - Mock [`QuoteStream`](crate::port::outbound::QuoteStream)
//!   implementations: `ScriptedStream`, `ChannelStream`.
//! - [`store`] - [`FlakyStore`](store::FlakyStore), an in-memory store with
//!   switchable failures.
//! - [`domain`] - Quote builders and batch helpers.
//! - [`clock`] - A settable [`Clock`](crate::application::pricing::Clock).
//! - [`config`] - Canonical test configurations.

pub mod clock;
pub mod config;
pub mod domain;
pub mod store;
pub mod stream;
