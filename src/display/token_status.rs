//! Certificate link status display.
//!
//! Renders a decoded claim and its expiry state:
//! - Valid links: "VALID (expires in X)"
//! - Expired links: "EXPIRED (X ago)"

use certlink::{CertificateLinkClaim, replace_control_chars};
use chrono::DateTime;
use serde_json::{Value, json};

/// What end users see for any rejected link, whatever the reason.
pub const GENERIC_INVALID_MESSAGE: &str = "this certificate link is no longer valid";

/// Format a millisecond span as a compact duration, e.g. `3d 4h 5m`.
///
/// Shows up to three units starting at the largest non-zero one; sub-second spans
/// render as `<1s`.
pub fn format_duration(millis: i64) -> String {
    let millis = millis.unsigned_abs();
    if millis == 0 {
        return "0s".to_string();
    }
    if millis < 1_000 {
        return "<1s".to_string();
    }

    let total_secs = millis / 1_000;
    let parts = [
        (total_secs / 86_400, "d"),
        ((total_secs % 86_400) / 3_600, "h"),
        ((total_secs % 3_600) / 60, "m"),
        (total_secs % 60, "s"),
    ];

    parts
        .iter()
        .skip_while(|(n, _)| *n == 0)
        .take(3)
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line expiry status for a claim at `now_millis`.
pub fn expiry_status(claim: &CertificateLinkClaim, now_millis: i64) -> String {
    if claim.is_expired_at(now_millis) {
        format!(
            "EXPIRED ({} ago)",
            format_duration(now_millis.saturating_sub(claim.expires_at))
        )
    } else {
        format!(
            "VALID (expires in {})",
            format_duration(claim.remaining_at(now_millis))
        )
    }
}

/// Render a millisecond timestamp as RFC 3339, falling back to the raw
/// number when it is out of range.
fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

/// Human-readable rendering of a claim and its status.
///
/// Identifiers are issuer-supplied, so control characters are replaced
/// before they reach the terminal.
pub fn render_claim(claim: &CertificateLinkClaim, now_millis: i64) -> String {
    [
        "--- Certificate Link ---".to_string(),
        format!("Organization: {}", replace_control_chars(&claim.organization_id)),
        format!("Program:      {}", replace_control_chars(&claim.program_id)),
        format!("Certificate:  {}", replace_control_chars(&claim.certificate_id)),
        String::new(),
        "--- Token Status ---".to_string(),
        format!("Issued at:    {}", format_timestamp(claim.issued_at)),
        format!("Expires at:   {}", format_timestamp(claim.expires_at)),
        format!("Status:       {}", expiry_status(claim, now_millis)),
    ]
    .join("\n")
}

/// Print a claim and its status to stdout.
pub fn display_claim(claim: &CertificateLinkClaim, now_millis: i64) {
    println!("{}", render_claim(claim, now_millis));
}

/// JSON rendering of a claim and its status at `now_millis`.
pub fn claim_to_json(claim: &CertificateLinkClaim, now_millis: i64) -> Value {
    json!({
        "valid": !claim.is_expired_at(now_millis),
        "organizationId": claim.organization_id,
        "programId": claim.program_id,
        "certificateId": claim.certificate_id,
        "issuedAt": claim.issued_at,
        "issuedAtUtc": format_timestamp(claim.issued_at),
        "expiresAt": claim.expires_at,
        "expiresAtUtc": format_timestamp(claim.expires_at),
        "remainingMs": claim.remaining_at(now_millis),
    })
}
