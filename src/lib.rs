//! odds-optimizer - streaming odds re-pricing with a cached read API.
//!
//! Normalized back/lay quotes arrive as batches on a stream. Each quote is
//! re-priced to embed a liquidity- and sport-dependent margin, scored for
//! confidence, written to a TTL cache and served over HTTP.
//!
//! # Architecture
//!
//! Hexagonal layout: the domain and application layers know nothing about
//! Redis, axum or clap.
//!
//! - [`domain`] - Quote records, keys, parameters and validation errors
//! - [`port`] - Inbound (use case) and outbound (store, stream) contracts
//! - [`application`] - Pricing engine, quote cache, ingestion loop, read service
//! - [`adapter`] - HTTP API, CLI, in-memory and Redis backends
//! - [`infrastructure`] - Configuration, wiring and runtime lifecycle
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `redis` (default) - Redis store and stream consumer
//! - `testkit` - Test doubles for integration tests
//!
//! # Example
//!
//! ```
//! use odds_optimizer::application::pricing::PricingEngine;
//! use odds_optimizer::domain::OptimizationParameters;
//! use odds_optimizer::port::inbound::Pricer;
//!
//! let engine = PricingEngine::new(OptimizationParameters::default());
//! assert!(engine.price_batch(&[]).priced.is_empty());
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
