//! `odds-optimizer check` exit codes and output.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("odds-optimizer").expect("binary builds");
    cmd.env_remove("ODDS_OPTIMIZER_REDIS_URL")
        .env_remove("ODDS_OPTIMIZER_STREAM_URL")
        .env_remove("ODDS_OPTIMIZER_BIND_ADDR");
    cmd
}

#[test]
fn check_accepts_valid_config() {
    let file = write_config("[redis]\nttl_secs = 60\n");

    cli()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("ttl_secs = 60"));
}

#[test]
fn check_rejects_invalid_config() {
    let file = write_config("[optimization]\nmin_margin = 0.2\nmax_margin = 0.1\n");

    cli()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("max_margin"))
        .stderr(predicate::str::contains("optimization"));
}

#[test]
fn check_rejects_missing_file() {
    cli()
        .args(["check", "--config", "/nonexistent/odds-optimizer.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn check_rejects_malformed_toml() {
    let file = write_config("[server\n");

    cli()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn check_emits_json_report() {
    let file = write_config("");

    let output = cli()
        .args(["check", "--json", "--config"])
        .arg(file.path())
        .output()
        .expect("run odds-optimizer");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = stdout
        .lines()
        .find_map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).ok()?;
            (value["command"] == "check").then_some(value)
        })
        .expect("check report line");

    assert_eq!(report["status"], "healthy");
    assert_eq!(report["checks"].as_array().map(Vec::len), Some(5));
    assert_eq!(report["effective"]["stream"]["key"], "normalized_odds");
}

#[test]
fn unknown_command_fails() {
    cli().arg("serve").assert().failure();
}
