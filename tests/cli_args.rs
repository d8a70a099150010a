//! Integration tests for CLI argument handling
//!
//! Tests the flag surface of the built binary. Every scenario here fails (or
//! succeeds) before any network I/O, so the tests run offline.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_geturl"))
        .args(args)
        .output()
        .expect("Failed to execute geturl")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("geturl"), "Help should mention geturl");
    assert!(stdout.contains("--param"), "Help should mention --param");
    assert!(stdout.contains("--retries"), "Help should mention --retries");
    assert!(stdout.contains("--no-cache"), "Help should mention --no-cache");
    assert!(stdout.contains("--refresh"), "Help should mention --refresh");
}

#[test]
fn test_missing_url_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success(), "Expected missing URL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("URL") || stderr.contains("required"),
        "Should complain about the missing URL argument: {}",
        stderr
    );
}

#[test]
fn test_malformed_param_is_rejected_before_fetching() {
    let output = run_cli(&["http://127.0.0.1:1/", "--param", "noequals"]);
    assert!(!output.status.success(), "Expected malformed param to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid parameter") || stderr.contains("KEY=VALUE"),
        "Should print error message about the malformed param: {}",
        stderr
    );
}

#[test]
fn test_zero_retries_is_rejected_before_fetching() {
    let output = run_cli(&["http://127.0.0.1:1/", "--retries", "0", "--no-cache"]);
    assert!(!output.status.success(), "Expected zero retries to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("retries") || stderr.contains("attempt"),
        "Should complain about the retries value: {}",
        stderr
    );
}

#[test]
fn test_invalid_url_fails_fast() {
    let output = run_cli(&["not a url", "--no-cache"]);
    assert!(!output.status.success(), "Expected an invalid URL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid URL"),
        "Should report the invalid URL: {}",
        stderr
    );
}

#[test]
fn test_non_http_scheme_fails_fast() {
    let output = run_cli(&["ftp://example.com/file", "--no-cache"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid URL"), "stderr: {}", stderr);
}
