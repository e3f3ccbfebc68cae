//! Infrastructure configuration modules.

pub mod logging;
pub mod optimization;
pub mod redis;
pub mod server;
pub mod settings;
pub mod stream;

pub use settings::Config;
