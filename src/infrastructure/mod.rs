//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! - [`config`] - Configuration loading and validation
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`orchestration`] - Runtime lifecycle and configuration health

pub mod bootstrap;
pub mod config;
pub mod orchestration;
