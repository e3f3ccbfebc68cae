//! Configuration health reporting for `odds-optimizer check`.

use crate::infrastructure::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    name: &'static str,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    /// Names of failing critical checks, in report order.
    pub fn failures(&self) -> Vec<&'static str> {
        self.checks
            .iter()
            .filter(|check| check.critical() && !check.is_healthy())
            .map(HealthCheck::name)
            .collect()
    }

    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical())
            .all(HealthCheck::is_healthy)
    }
}

fn status_of<E: std::fmt::Display>(result: Result<(), E>) -> HealthStatus {
    match result {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    }
}

/// Check every configuration section independently.
pub fn health_check(config: &Config) -> HealthReport {
    let checks = vec![
        HealthCheck {
            name: "server",
            critical: true,
            status: status_of(config.validate_server()),
        },
        HealthCheck {
            name: "cache",
            critical: true,
            status: status_of(config.validate_cache()),
        },
        HealthCheck {
            name: "stream",
            critical: config.stream.enabled,
            status: status_of(config.validate_stream()),
        },
        HealthCheck {
            name: "optimization",
            critical: true,
            status: status_of(config.optimization.parameters().map(|_| ())),
        },
        HealthCheck {
            name: "logging",
            critical: true,
            status: status_of(config.validate_logging()),
        },
    ];

    HealthReport { checks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_config_is_healthy() {
        let report = health_check(&Config::default());
        assert!(report.is_healthy());
        assert_eq!(report.checks().len(), 5);
        assert!(report.failures().is_empty());
    }

    #[test]
    fn reports_every_failing_section() {
        let mut config = Config::default();
        config.server.bind_addr = "not-an-address".to_string();
        config.optimization.min_spread = dec!(0);

        let report = health_check(&config);
        assert!(!report.is_healthy());
        assert_eq!(report.failures(), vec!["server", "optimization"]);
    }

    #[test]
    fn disabled_stream_is_not_critical() {
        let mut config = Config::default();
        config.stream.enabled = false;
        config.stream.key = String::new();

        let report = health_check(&config);
        assert!(report.is_healthy());

        let stream = report
            .checks()
            .iter()
            .find(|check| check.name() == "stream")
            .unwrap();
        assert!(!stream.critical());
        assert!(!stream.is_healthy());
    }

    #[test]
    fn unknown_log_format_fails() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        let report = health_check(&config);
        assert_eq!(report.failures(), vec!["logging"]);
        assert!(matches!(
            report.checks()[4].status(),
            HealthStatus::Unhealthy(reason) if reason.contains("xml")
        ));
    }

    #[test]
    fn optimization_check_reports_parameter_errors() {
        let healthy = health_check(&Config::default());
        assert_eq!(healthy.checks()[3].name(), "optimization");
        assert_eq!(healthy.checks()[3].status(), &HealthStatus::Healthy);

        let mut config = Config::default();
        config.optimization.min_margin = dec!(0.5);
        config.optimization.max_margin = dec!(0.1);
        let report = health_check(&config);
        assert!(matches!(
            report.checks()[3].status(),
            HealthStatus::Unhealthy(reason) if reason.contains("margin")
        ));
    }
}
