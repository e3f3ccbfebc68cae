//! Inbound adapters (driving side): the HTTP read API and the CLI.

pub mod cli;
pub mod http;
