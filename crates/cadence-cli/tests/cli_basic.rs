//! Basic CLI E2E tests.
//!
//! Tests invoke the built CLI binary against a throwaway config file and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `config` and return (stdout, stderr, code).
fn run_cli(config: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cadence-cli"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_schedule_preview_default_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&config, &["schedule", "preview", "--count", "6"]);
    assert_eq!(code, 0, "schedule preview failed");

    let entries = parse_json(&stdout);
    let types: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["block_type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        types,
        vec!["work", "shortpause", "work", "shortpause", "work", "longpause"]
    );
    assert_eq!(entries[0]["duration_ms"], 25 * 60 * 1000 + 900);
    assert_eq!(entries[5]["index"], 5);
}

#[test]
fn test_schedule_simulate_logs_events() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(
        &config,
        &["schedule", "simulate", "--advances", "3", "--manual", "--log-events"],
    );
    assert_eq!(code, 0, "schedule simulate failed");

    let report = parse_json(&stdout);
    assert_eq!(report["started"].as_array().unwrap().len(), 3);
    assert_eq!(report["queue"].as_array().unwrap().len(), 5);
    assert_eq!(report["queue"][0]["index"], 3);
    let events = report["events"].as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|e| e["event_type"] == "schedule.advmanual"));
}

#[test]
fn test_schedule_simulate_without_logging_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&config, &["schedule", "simulate", "--advances", "2"]);
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert!(report["events"].as_array().unwrap().is_empty());
}

#[test]
fn test_tick_rate_hidden_approximate() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&config, &["tick-rate", "--hidden"]);
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert_eq!(report["tick_rate_ms"], 300_000);
    assert_eq!(report["visibility"], "hidden");

    let (stdout, _, _) = run_cli(&config, &["tick-rate", "--visible", "--disabled"]);
    assert_eq!(parse_json(&stdout)["tick_rate_ms"], 1000);
}

#[test]
fn test_tick_rate_unknown_style_keeps_configured() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&config, &["tick-rate", "--visible", "--style", "sundial"]);
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert_eq!(report["clock_style"], "approximate");
    assert_eq!(report["tick_rate_ms"], 30_000);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&config, &["config", "set", "schedule.long_pause_interval", "2"]);
    assert_eq!(code, 0, "config set failed");
    assert!(stdout.contains("ok"));

    let (stdout, _, _) = run_cli(&config, &["config", "get", "schedule.long_pause_interval"]);
    assert_eq!(stdout.trim(), "2");

    let (stdout, _, _) = run_cli(&config, &["schedule", "preview", "--count", "4"]);
    let entries = parse_json(&stdout);
    assert_eq!(entries[3]["block_type"], "longpause");
}

#[test]
fn test_config_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (_, stderr, code) = run_cli(&config, &["config", "set", "schedule.long_pause_interval", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(&config, &["config", "get", "ui.dark_mode"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_rejects_overflowing_interval() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (_, stderr, code) = run_cli(
        &config,
        &["config", "set", "schedule.long_pause_interval", "3000000000"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("long_pause_interval"));

    let (stdout, _, code) = run_cli(&config, &["schedule", "preview", "--count", "2"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("work"));
}

#[test]
fn test_preset_apply() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&config, &["preset", "apply", "debug"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["applied"], "timer");

    let (stdout, _, _) = run_cli(&config, &["config", "get", "schedule.lengths.work"]);
    assert_eq!(stdout.trim(), "95000");

    let (stdout, _, code) = run_cli(&config, &["preset", "apply", "traditional"]);
    assert_eq!(code, 0);
    let applied = parse_json(&stdout);
    assert_eq!(applied["clock_style"], "traditional");
    assert_eq!(applied["tick_rate"]["normal"], 1000);

    let (_, stderr, code) = run_cli(&config, &["preset", "apply", "retro"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown preset"));
}
