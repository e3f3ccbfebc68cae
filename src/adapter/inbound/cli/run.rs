//! Handler for the `run` command.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::command::RunArgs;
use super::output;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::orchestration::{run_with_shutdown, RunOptions};

const DEFAULT_CONFIG: &str = "config.toml";

/// Load the configuration, initialize logging and run until `cancel` fires.
///
/// # Errors
///
/// Configuration and startup failures.
pub async fn execute(args: &RunArgs, cancel: CancellationToken) -> Result<()> {
    let (config, from_defaults) = load_config(&args.config)?;
    config.logging.init();
    if from_defaults {
        warn!(path = %args.config.display(), "Config file not found, using defaults");
    }

    if !output::is_quiet() {
        print_startup(args, &config);
    }

    run_with_shutdown(config, RunOptions::in_memory(args.in_memory), cancel).await
}

/// A missing file at the default path means "use defaults plus environment".
fn load_config(path: &Path) -> Result<(Config, bool)> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        return Ok((Config::parse_toml("")?, true));
    }
    Ok((Config::load(path)?, false))
}

fn print_startup(args: &RunArgs, config: &Config) {
    let backend = if args.in_memory { "memory" } else { "redis" };
    let stream = if config.stream.enabled && !args.in_memory {
        config.stream.key.as_str()
    } else {
        "disabled"
    };

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Listen", &config.server.bind_addr);
    output::field("Cache", backend);
    output::field("Stream", stream);
    output::field("TTL", format!("{}s", config.redis.ttl_secs));
}
