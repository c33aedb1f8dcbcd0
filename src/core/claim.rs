//! The plaintext payload bound into a certificate link token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Expiry window applied when the caller doesn't choose one.
pub const DEFAULT_EXPIRATION_DAYS: f64 = 365.0;

/// Identifiers and validity window carried inside a certificate link.
///
/// Only obtainable from `TokenCodec::decode` (or by minting); never trust
/// fields read out of a token any other way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateLinkClaim {
    /// Opaque organization identifier.
    pub organization_id: String,
    /// Opaque program identifier.
    pub program_id: String,
    /// Opaque certificate identifier.
    pub certificate_id: String,
    /// Issuance instant, milliseconds since the Unix epoch.
    #[serde(rename = "timestamp", alias = "issuedAt")]
    pub issued_at: i64,
    /// Expiry instant, milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl CertificateLinkClaim {
    /// Whether the claim has expired at `now_millis`.
    ///
    /// A claim is still valid at exactly `expires_at`.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }

    /// Milliseconds left before expiry at `now_millis`, floored at zero.
    pub fn remaining_at(&self, now_millis: i64) -> i64 {
        self.expires_at.saturating_sub(now_millis).max(0)
    }

    /// Issuance instant as a UTC timestamp, if representable.
    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.issued_at)
    }

    /// Expiry instant as a UTC timestamp, if representable.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires_at)
    }
}

/// Convert an expiry window in days to whole milliseconds.
///
/// Returns `None` for non-finite, non-positive, or unrepresentable windows.
/// Positive windows shorter than a millisecond round up to one so that
/// `expires_at > issued_at` always holds.
pub fn window_millis(expiration_days: f64) -> Option<i64> {
    if !expiration_days.is_finite() || expiration_days <= 0.0 {
        return None;
    }
    let millis = (expiration_days * MILLIS_PER_DAY).round();
    if millis >= i64::MAX as f64 {
        return None;
    }
    Some((millis as i64).max(1))
}
