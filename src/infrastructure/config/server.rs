//! HTTP listener settings.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the read API.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// How long in-flight requests may run after shutdown begins.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

const fn default_shutdown_timeout_secs() -> u64 {
    10
}

impl ServerConfig {
    /// Parsed listen address, `None` when `bind_addr` is not `host:port`.
    #[must_use]
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_addr.parse().ok()
    }

    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}
