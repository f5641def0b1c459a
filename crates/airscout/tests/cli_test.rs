//! Integration tests for the `airscout` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! offline parsing/decoding, and scan error handling. Scans run against
//! stand-in `iw` scripts so no wireless hardware or root is needed.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `airscout` binary with env isolation.
///
/// Clears the `AIRSCOUT_*` env vars the CLI and config layer read, and
/// points config directories at a nonexistent path so tests never touch
/// the user's real configuration.
fn airscout_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("airscout");
    cmd.env("HOME", "/tmp/airscout-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/airscout-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("AIRSCOUT_PROFILE")
        .env_remove("AIRSCOUT_DEFAULT_PROFILE")
        .env_remove("AIRSCOUT_SCAN__IW_PATH")
        .env_remove("AIRSCOUT_SCAN__IWCONFIG_PATH")
        .env_remove("AIRSCOUT_SCAN__MAX_ATTEMPTS")
        .env_remove("AIRSCOUT_SCAN__FULL_SCAN_RETRY_MS")
        .env_remove("AIRSCOUT_SCAN__HUNT_RETRY_MS")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const SAMPLE_SCAN: &str = "\
BSS aa:bb:cc:dd:ee:01(on wlan0)
\tfreq: 5180
\tcapability: ESS Privacy (0x0011)
\tsignal: -58.00 dBm
\tSSID: HomeNet
\tRSN:\t * Version: 1
\t\t * Pairwise ciphers: CCMP
\t\t * Authentication suites: PSK
\tHT operation:
\t\t * primary channel: 36
BSS aa:bb:cc:dd:ee:02(on wlan0)
\tfreq: 2437
\tcapability: ESS (0x0401)
\tsignal: -71.00 dBm
\tSSID: Cafe
\tDS Parameter set: channel 6
";

fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// An executable stand-in for `iw` that prints `body` and exits with `status`.
#[cfg(unix)]
fn fake_iw(dir: &Path, body: &str, status: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!("#!/bin/sh\ncat <<'IWEOF'\n{body}IWEOF\nexit {status}\n");
    let path = write_file(dir, "iw", &script);
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = airscout_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    airscout_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("wireless networks")
            .and(predicate::str::contains("scan"))
            .and(predicate::str::contains("parse"))
            .and(predicate::str::contains("channels")),
    );
}

#[test]
fn test_version_flag() {
    airscout_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("airscout"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    airscout_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    airscout_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = airscout_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    airscout_cmd()
        .args(["channels", "-o", "xml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_lat_requires_lon() {
    let output = airscout_cmd()
        .args(["scan", "-i", "wlan0", "--lat", "47.5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--lon"), "Expected missing --lon error:\n{text}");
}

// ── Channels ────────────────────────────────────────────────────────

#[test]
fn test_channels_plain() {
    airscout_cmd()
        .args(["channels", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("6 2437")
                .and(predicate::str::contains("36 5180"))
                .and(predicate::str::contains("196 4980")),
        );
}

#[test]
fn test_channels_json() {
    let output = airscout_cmd()
        .args(["channels", "-o", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &rows.as_array().unwrap()[0];
    assert_eq!(first["channel"], 1);
    assert_eq!(first["frequency"], 2412);
    assert_eq!(first["band"], "2.4 GHz");
}

// ── Parse ───────────────────────────────────────────────────────────

#[test]
fn test_parse_file_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "scan.txt", SAMPLE_SCAN);

    let output = airscout_cmd()
        .args(["parse", "-o", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let docs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let docs = docs.as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["macAddr"], "aa:bb:cc:dd:ee:01");
    assert_eq!(docs[0]["security"], "PSK");
    assert_eq!(docs[0]["gpsvalid"], "False");
    assert_eq!(docs[1]["ssid"], "Cafe");
    assert_eq!(docs[1]["channel"], 6);
}

#[test]
fn test_parse_stdin_plain() {
    airscout_cmd()
        .args(["parse", "-o", "plain", "-"])
        .write_stdin(SAMPLE_SCAN)
        .assert()
        .success()
        .stdout("aa:bb:cc:dd:ee:01\naa:bb:cc:dd:ee:02\n");
}

#[test]
fn test_parse_table() {
    airscout_cmd()
        .args(["parse", "-"])
        .write_stdin(SAMPLE_SCAN)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("BSSID")
                .and(predicate::str::contains("HomeNet"))
                .and(predicate::str::contains("-58 dBm")),
        );
}

#[test]
fn test_parse_missing_file() {
    let output = airscout_cmd()
        .args(["parse", "/tmp/airscout-cli-test-nonexistent/scan.txt"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("Could not read"), "Expected read error:\n{text}");
}

// ── Decode ──────────────────────────────────────────────────────────

#[test]
fn test_decode_reports_field_failures() {
    let dir = tempfile::tempdir().unwrap();
    let doc = r#"{
        "errCode": 0,
        "errString": "",
        "gps": {"latitude": 0.0, "longitude": 0.0, "altitude": 0.0, "speed": 0.0},
        "networks": [{"macAddr": "aa:bb:cc:dd:ee:02", "ssid": "Cafe", "channel": "6", "signal": "strong"}]
    }"#;
    let path = write_file(dir.path(), "scan.json", doc);

    let output = airscout_cmd().arg("decode").arg(&path).output().unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SSID: Cafe"), "stdout:\n{stdout}");
    assert!(stdout.contains("Channel: 6"), "stdout:\n{stdout}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("field could not be decoded"), "stderr:\n{stderr}");
}

#[test]
fn test_decode_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "scan.json", "{ not json");

    let output = airscout_cmd().arg("decode").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("Invalid scan document"), "Expected JSON error:\n{text}");
}

// ── Scan ────────────────────────────────────────────────────────────

#[test]
fn test_scan_without_interface() {
    let output = airscout_cmd().arg("scan").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No wireless interface"), "Expected interface error:\n{text}");
}

#[test]
fn test_scan_unknown_profile() {
    let output = airscout_cmd()
        .args(["--profile", "attic", "scan", "-i", "wlan0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Profile 'attic' not found"), "Expected profile error:\n{text}");
    assert!(text.contains("(none)"), "Expected empty profile list:\n{text}");
}

#[test]
fn test_scan_missing_iw_binary() {
    let output = airscout_cmd()
        .env("AIRSCOUT_SCAN__IW_PATH", "/tmp/airscout-cli-test-nonexistent/iw")
        .args(["scan", "-i", "wlan0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("Could not run"), "Expected spawn error:\n{text}");
}

#[cfg(unix)]
#[test]
fn test_scan_success_json() {
    let dir = tempfile::tempdir().unwrap();
    let iw = fake_iw(dir.path(), SAMPLE_SCAN, 0);

    let output = airscout_cmd()
        .env("AIRSCOUT_SCAN__IW_PATH", &iw)
        .args(["scan", "-i", "wlan0", "-o", "json", "--lat", "47.5", "--lon", "-122.25"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["errCode"], 0);
    assert_eq!(doc["gps"]["latitude"], 47.5);
    let nets = doc["networks"].as_array().unwrap();
    assert_eq!(nets.len(), 2);
    assert_eq!(nets[0]["lat"], "47.5");
    assert_eq!(nets[0]["gpsvalid"], "True");
    assert_eq!(nets[0]["strongestgpsvalid"], "False");
}

#[cfg(unix)]
#[test]
fn test_scan_permission_denied_prints_document() {
    let dir = tempfile::tempdir().unwrap();
    let iw = fake_iw(dir.path(), "command failed: Operation not permitted (-1)\n", 255);

    let output = airscout_cmd()
        .env("AIRSCOUT_SCAN__IW_PATH", &iw)
        .args(["scan", "-i", "wlan0", "-o", "json-compact"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let doc: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(doc["errCode"], 255);
    assert_eq!(
        doc["errString"],
        "command failed: Operation not permitted (-1). Did you run as root?"
    );
    assert_eq!(doc["networks"], serde_json::json!([]));
}

#[cfg(unix)]
#[test]
fn test_scan_busy_is_reported_after_retries() {
    let dir = tempfile::tempdir().unwrap();
    let iw = fake_iw(dir.path(), "command failed: Device or resource busy (-16)\n", 240);

    let output = airscout_cmd()
        .env("AIRSCOUT_SCAN__IW_PATH", &iw)
        .env("AIRSCOUT_SCAN__FULL_SCAN_RETRY_MS", "0")
        .args(["scan", "-i", "wlan0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    let text = combined_output(&output);
    assert!(text.contains("Device is busy"), "Expected busy error:\n{text}");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    airscout_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    airscout_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[scan]")
                .and(predicate::str::contains("iw_path = \"iw\""))
                .and(predicate::str::contains("max_attempts = 3")),
        );
}
