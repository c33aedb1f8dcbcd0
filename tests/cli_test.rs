//! Integration tests for the certlink CLI.
//!
//! Tests argument parsing, help text, version output, subcommand routing,
//! token input sources, generic rejection messages, and exit codes.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use certlink::{TokenCodec, format_share_link};
use predicates::prelude::*;

fn cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("certlink");
    cmd.env_remove("CERTLINK_KEY").env_remove("CERTLINK_LOG");
    cmd
}

fn keyed() -> assert_cmd::Command {
    let mut cmd = cmd();
    cmd.env("CERTLINK_KEY", common::TEST_KEY);
    cmd
}

// --- Help and Version ---

#[test]
fn test_no_args_shows_usage_hint() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_help_flag_shows_description() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("certificate share links"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("certlink"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_decode_help_shows_options() {
    cmd()
        .args(["decode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--token-env"))
        .stdout(predicate::str::contains("--time-travel"))
        .stdout(predicate::str::contains("--key-env"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("[TOKEN]"));
}

#[test]
fn test_encode_help_includes_shell_history_warning() {
    cmd()
        .args(["encode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shell history"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cmd().arg("unknown").assert().failure().stderr(
        predicate::str::contains("invalid value 'unknown'")
            .or(predicate::str::contains("unrecognized subcommand")),
    );
}

// --- Encode ---

#[test]
fn test_encode_prints_decodable_token() {
    let output = keyed()
        .args(["encode", "org1", "prog1", "cert1", "--days", "10"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let token = stdout.trim();
    assert!(token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'%'));

    let claim = TokenCodec::new(&common::test_key()).decode(token).unwrap();
    assert_eq!(claim.organization_id, "org1");
    assert_eq!(claim.certificate_id, "cert1");
    assert_eq!(claim.expires_at - claim.issued_at, 10 * common::DAY_MS);
}

#[test]
fn test_encode_with_base_url_prints_share_link() {
    keyed()
        .args([
            "encode",
            "org1",
            "prog1",
            "cert1",
            "--base-url",
            "https://certs.example.com/",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://certs.example.com/#/certificate/org1/prog1/",
        ));
}

#[test]
fn test_encode_json_mode_outputs_valid_json() {
    let output = keyed()
        .args(["encode", "--json", "org1", "prog1", "cert1"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    assert!(parsed["token"].is_string());
    assert!(parsed["url"].is_null());
    assert_eq!(parsed["expirationDays"], 365.0);
}

#[test]
fn test_encode_with_key_flag() {
    let output = cmd()
        .args(["encode", "o", "p", "c", "--key", common::OTHER_KEY])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let other = certlink::CodecKey::from_passphrase(common::OTHER_KEY).unwrap();
    assert!(TokenCodec::new(&other).decode(&token).is_ok());
    assert!(TokenCodec::new(&common::test_key()).decode(&token).is_err());
}

#[test]
fn test_encode_with_key_env() {
    cmd()
        .args(["encode", "o", "p", "c", "--key-env", "CERTLINK_TEST_SECRET"])
        .env("CERTLINK_TEST_SECRET", common::TEST_KEY)
        .assert()
        .success();
}

#[test]
fn test_encode_without_key_fails() {
    cmd()
        .args(["encode", "o", "p", "c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no codec key provided"));
}

#[test]
fn test_encode_empty_identifier_fails() {
    keyed()
        .args(["encode", "", "prog1", "cert1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("organization id must not be empty"));
}

#[test]
fn test_encode_non_positive_days_fails() {
    keyed()
        .args(["encode", "o", "p", "c", "--days", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid expiration window"));
}

// --- Decode: Success ---

#[test]
fn test_decode_valid_token_shows_claim_and_status() {
    let token = common::fresh_token();
    keyed()
        .args(["decode", token.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Certificate Link ---"))
        .stdout(predicate::str::contains("org1"))
        .stdout(predicate::str::contains("cert1"))
        .stdout(predicate::str::contains("Token Status"))
        .stdout(predicate::str::contains("VALID (expires in"));
}

#[test]
fn test_decode_json_mode_outputs_valid_json() {
    let token = common::fresh_token();
    let output = keyed()
        .args(["decode", "--json", token.as_str()])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["programId"], "prog1");
    assert_eq!(parsed["certificateId"], "cert1");
}

#[test]
fn test_decode_from_stdin_with_trailing_newline() {
    let token = common::fresh_token();
    keyed()
        .arg("decode")
        .write_stdin(format!("{}\n", token))
        .assert()
        .success()
        .stdout(predicate::str::contains("cert1"));
}

#[test]
fn test_decode_from_env_var() {
    let token = common::fresh_token();
    keyed()
        .args(["decode", "--token-env", "TEST_CERT_TOKEN"])
        .env("TEST_CERT_TOKEN", token.as_str())
        .assert()
        .success()
        .stdout(predicate::str::contains("cert1"));
}

#[test]
fn test_decode_expired_token_with_time_travel_into_window() {
    let token = common::expired_token();
    keyed()
        .args([
            "decode",
            token.as_str(),
            "--time-travel",
            "2024-01-15T12:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("VALID"));
}

// --- Decode: Rejection ---

#[test]
fn test_decode_expired_token_is_generic_failure() {
    let token = common::expired_token();
    keyed()
        .args(["decode", token.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("this certificate link is no longer valid"))
        .stderr(predicate::str::contains("expired").not());
}

#[test]
fn test_decode_garbage_is_generic_failure() {
    keyed()
        .args(["decode", common::INVALID_TOKEN])
        .assert()
        .failure()
        .stderr(predicate::str::contains("this certificate link is no longer valid"));
}

#[test]
fn test_decode_malformed_is_generic_failure() {
    keyed()
        .args(["decode", common::MALFORMED_TOKEN])
        .assert()
        .failure()
        .stderr(predicate::str::contains("this certificate link is no longer valid"))
        .stderr(predicate::str::contains("percent").not());
}

#[test]
fn test_decode_other_key_is_generic_failure() {
    let token = common::other_key_token();
    keyed()
        .args(["decode", token.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("this certificate link is no longer valid"));
}

#[test]
fn test_decode_time_travel_past_expiry_fails() {
    let token = common::fresh_token();
    keyed()
        .args(["decode", token.as_str(), "--time-travel", "+60d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer valid"));
}

#[test]
fn test_decode_json_rejection() {
    let output = keyed()
        .args(["decode", "--json", common::INVALID_TOKEN])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    assert_eq!(parsed, serde_json::json!({ "valid": false }));
}

#[test]
fn test_decode_no_token_shows_error() {
    keyed()
        .arg("decode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token provided"));
}

#[test]
fn test_decode_empty_token_arg_shows_error() {
    keyed()
        .args(["decode", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token provided"));
}

#[test]
fn test_decode_env_var_not_set_shows_error() {
    keyed()
        .args(["decode", "--token-env", "NONEXISTENT_CERT_VAR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NONEXISTENT_CERT_VAR"));
}

#[test]
fn test_decode_invalid_env_var_name_with_equals() {
    keyed()
        .args(["decode", "--token-env", "BAD=NAME"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid environment variable name"));
}

#[test]
fn test_decode_invalid_time_expression() {
    keyed()
        .args(["decode", common::INVALID_TOKEN, "--time-travel", "+7x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time expression '+7x'"));
}

#[test]
fn test_decode_without_key_fails() {
    let token = common::fresh_token();
    cmd()
        .args(["decode", token.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no codec key provided"));
}

// --- Status ---

#[test]
fn test_status_valid() {
    let token = common::fresh_token();
    keyed()
        .args(["status", token.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("valid (expires in"));
}

#[test]
fn test_status_expired() {
    let token = common::expired_token();
    keyed()
        .args(["status", token.as_str()])
        .assert()
        .failure()
        .stdout(predicate::str::diff("expired\n"));
}

#[test]
fn test_status_unreadable() {
    keyed()
        .args(["status", "garbage"])
        .assert()
        .failure()
        .stdout(predicate::str::diff("unreadable\n"));
}

#[test]
fn test_status_json_three_values() {
    let expired = common::expired_token();
    let output = keyed()
        .args(["status", "--json", expired.as_str()])
        .output()
        .expect("failed to execute");
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["state"], "expired");
    assert_eq!(parsed["expired"], true);
    assert_eq!(parsed["remainingMs"], 0);

    let output = keyed()
        .args(["status", "--json", "garbage"])
        .output()
        .expect("failed to execute");
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["state"], "unreadable");
    assert!(parsed["expired"].is_null());
    assert!(parsed["remainingMs"].is_null());
}

// --- Link ---

#[test]
fn test_link_valid_share_url() {
    let token = common::fresh_token();
    let url = format_share_link("https://certs.example.com", "org1", "prog1", &token);
    keyed()
        .args(["link", url.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("cert1"));
}

#[test]
fn test_link_with_moved_token_is_rejected() {
    let token = common::fresh_token();
    let url = format_share_link("https://certs.example.com", "someone-else", "prog1", &token);
    keyed()
        .args(["link", url.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("this certificate link is no longer valid"));
}

#[test]
fn test_link_rejects_non_certificate_url() {
    keyed()
        .args(["link", "https://certs.example.com/#/dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid share link"));
}

// --- Health ---

#[test]
fn test_health_rejects_non_http_scheme() {
    cmd()
        .args(["health", "ftp://example.com/health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only http and https"));
}

#[test]
fn test_health_rejects_zero_attempts() {
    cmd()
        .args(["health", "https://example.com/health", "--attempts", "0"])
        .assert()
        .failure();
}

// --- Logging ---

#[test]
fn test_debug_logging_goes_to_stderr_only() {
    let output = keyed()
        .args(["decode", "--json", common::INVALID_TOKEN])
        .env("CERTLINK_LOG", "debug")
        .output()
        .expect("failed to execute");

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("logs leaked into stdout");
    assert_eq!(parsed, serde_json::json!({ "valid": false }));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rejected certificate link token"));
    assert!(stderr.contains("this certificate link is no longer valid"));
}
