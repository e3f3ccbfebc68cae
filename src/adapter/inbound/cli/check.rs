//! Handler for the `check` command.

use serde_json::json;

use super::command::CheckArgs;
use super::output;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::orchestration::{health_check, HealthReport, HealthStatus};

/// Validate the configuration file and print the effective settings.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or when any critical check
/// fails.
pub fn execute(args: &CheckArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.config).map_err(ConfigError::ReadFile)?;
    let config = Config::parse_unvalidated(&content)?;
    let report = health_check(&config);

    if output::is_json() {
        output::json_output(json!({
            "command": "check",
            "config": args.config.display().to_string(),
            "status": if report.is_healthy() { "healthy" } else { "unhealthy" },
            "checks": checks_json(&report),
            "effective": config,
        }));
    } else {
        print_report(&args.config.display().to_string(), &config, &report);
    }

    if !report.is_healthy() {
        return Err(Error::HealthCheck(report.failures().join(", ")));
    }
    output::success("Configuration is valid");
    Ok(())
}

fn checks_json(report: &HealthReport) -> Vec<serde_json::Value> {
    report
        .checks()
        .iter()
        .map(|check| {
            let (status, details) = describe(check.status());
            json!({
                "name": check.name(),
                "critical": check.critical(),
                "status": status,
                "details": details,
            })
        })
        .collect()
}

fn print_report(path: &str, config: &Config, report: &HealthReport) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Configuration Check");
    output::field("Config", path);

    for check in report.checks() {
        let (status, details) = describe(check.status());
        let value = match details {
            Some(reason) => format!("{status}: {reason}"),
            None => status.to_string(),
        };
        if check.critical() || check.is_healthy() {
            output::field(check.name(), value);
        } else {
            output::warning(&format!("{} ({value})", check.name()));
        }
    }

    output::section("Effective Configuration");
    match config.to_toml() {
        Ok(rendered) => output::lines(&rendered),
        Err(e) => output::warning(&format!("cannot render configuration: {e}")),
    }
}

fn describe(status: &HealthStatus) -> (&'static str, Option<&str>) {
    match status {
        HealthStatus::Healthy => ("ok", None),
        HealthStatus::Unhealthy(reason) => ("invalid", Some(reason.as_str())),
    }
}
