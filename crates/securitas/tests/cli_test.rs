//! Integration tests for the `securitas` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! config handling, and error exit codes without a live alarm service.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `securitas` binary with env isolation.
///
/// Clears all `SECURITAS_*` env vars and points `HOME` at `home` so tests
/// never touch the user's real configuration.
fn securitas_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("securitas");
    cmd.env("HOME", home)
        .env_remove("SECURITAS_ENDPOINT")
        .env_remove("SECURITAS_COUNTRY")
        .env_remove("SECURITAS_FLAVOR")
        .env_remove("SECURITAS_USERNAME")
        .env_remove("SECURITAS_PASSWORD")
        .env_remove("SECURITAS_INSTALLATION_ID")
        .env_remove("SECURITAS_OUTPUT")
        .env_remove("SECURITAS_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn config_file(home: &TempDir) -> std::path::PathBuf {
    home.path().join(".securitas-config.json")
}

fn write_config(home: &TempDir, json: &str) {
    std::fs::write(config_file(home), json).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = home();
    let output = securitas_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = home();
    securitas_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("alarm")
            .and(predicate::str::contains("installations"))
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("disarm")),
    );
}

#[test]
fn test_version_flag() {
    let home = home();
    securitas_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("securitas"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = home();
    securitas_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = home();
    securitas_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = home();
    let output = securitas_cmd(home.path()).arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected the bad subcommand in:\n{text}");
}

#[test]
fn test_invalid_arm_mode() {
    let home = home();
    securitas_cmd(home.path())
        .args(["arm", "--mode", "stealth"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stealth"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let home = home();
    securitas_cmd(home.path())
        .args(["--timeout", "0", "installations"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout"));
}

// ── Credentials ─────────────────────────────────────────────────────

#[test]
fn test_status_without_credentials() {
    let home = home();
    securitas_cmd(home.path())
        .arg("status")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("username"));
}

#[test]
fn test_login_without_terminal_needs_credentials() {
    let home = home();
    securitas_cmd(home.path())
        .args(["login", "--username", "alice"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("password"));
}

#[test]
fn test_unreachable_endpoint_is_connection_error() {
    let home = home();
    securitas_cmd(home.path())
        .args([
            "--endpoint",
            "http://127.0.0.1:9",
            "--username",
            "alice",
            "--password",
            "s3cret",
            "installations",
        ])
        .assert()
        .code(7);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    let home = home();
    securitas_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".securitas-config.json"));
}

#[test]
fn test_config_show_hides_password() {
    let home = home();
    write_config(
        &home,
        r#"{"username": "alice", "password": "s3cret", "installationId": "1234567"}"#,
    );

    securitas_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("alice")
                .and(predicate::str::contains("1234567"))
                .and(predicate::str::contains("s3cret").not()),
        );
}

#[test]
fn test_config_show_json() {
    let home = home();
    write_config(&home, r#"{"username": "alice"}"#);

    let output = securitas_cmd(home.path())
        .args(["--output", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["username"], "alice");
    assert_eq!(json["passwordStored"], false);
    assert!(json["installationId"].is_null());
}

#[test]
fn test_config_clear_requires_yes() {
    let home = home();
    write_config(&home, r#"{"username": "alice"}"#);

    securitas_cmd(home.path())
        .args(["config", "clear"])
        .assert()
        .code(2);
    assert!(
        std::fs::read_to_string(config_file(&home))
            .unwrap()
            .contains("alice")
    );

    securitas_cmd(home.path())
        .args(["--yes", "config", "clear"])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(config_file(&home)).unwrap(), "{}");
}

#[test]
fn test_logout_wipes_config() {
    let home = home();
    write_config(
        &home,
        r#"{"username": "alice", "password": "s3cret", "installationId": "1"}"#,
    );

    securitas_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));
    assert_eq!(std::fs::read_to_string(config_file(&home)).unwrap(), "{}");
}
