//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a scratch directory so
//! config and stats never touch the real user files.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &std::path::Path, args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_aether"))
        .args(args)
        .env("HOME", home)
        .env_remove("AETHER_ENV")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    // The process may exit before reading stdin.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_config_get_default() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_minutes"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_set_persists() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        home.path(),
        &["config", "set", "timer.focus_minutes", "45"],
        "",
    );
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_minutes"], "");
    assert_eq!(stdout.trim(), "45");
}

#[test]
fn test_config_set_rejects_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        home.path(),
        &["config", "set", "timer.short_break_minutes", "45"],
        "",
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "timer.nope"], "");
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_stats_today_starts_empty() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["stats", "today"], "");
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["pomodoros"], 0);
    assert_eq!(json["minutes"], 0);
}

#[test]
fn test_stats_week_has_seven_days() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["stats", "week"], "");
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["days"].as_array().unwrap().len(), 7);
    assert_eq!(json["total_minutes"], 0);
}

#[test]
fn test_stats_reset_requires_confirmation() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["stats", "reset"], "");
    assert_ne!(code, 0);
    let (code, _, _) = run_cli(home.path(), &["stats", "reset", "--yes"], "");
    assert_eq!(code, 0);
}

#[test]
fn test_run_quits_on_command() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["run"], "s\np\nr\nq\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("0 focus session(s) completed"));
}

#[test]
fn test_stats_range_rejects_huge_window() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["stats", "range", "--days", "5000"], "");
    assert_eq!(code, 2);
    assert!(!stderr.contains("panicked"));

    let (code, stdout, _) = run_cli(home.path(), &["stats", "range", "--days", "30"], "");
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["days"].as_array().unwrap().len(), 30);
}

#[test]
fn test_run_survives_malformed_config_reload() {
    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_aether"))
        .arg("run")
        .env("HOME", home.path())
        .env_remove("AETHER_ENV")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    // The help line is printed once the config file has been written.
    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut help = String::new();
    stdout.read_line(&mut help).unwrap();
    assert!(help.starts_with("commands:"));

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"s\n").unwrap();
    stdin.flush().unwrap();
    let config = home.path().join(".config").join("aether").join("config.toml");
    std::fs::write(&config, "timer = 3 = 4\n").unwrap();
    stdin.write_all(b"c\nq\n").unwrap();
    drop(stdin);

    let mut rest = String::new();
    std::io::Read::read_to_string(&mut stdout, &mut rest).unwrap();
    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr.contains("config not applied"));
    assert!(rest.contains("focus session(s) completed"));
}

#[test]
fn test_run_rejects_invalid_override() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["run", "--focus", "0"], "q\n");
    assert_ne!(code, 0);
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["completions", "bash"], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("aether"));
}
