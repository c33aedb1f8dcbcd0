//! Time-travel evaluation of certificate links.
//!
//! Parses time expressions (relative like "+7d" or absolute like RFC 3339)
//! so a token can be checked against a simulated "now".

use chrono::{DateTime, Duration, Utc};

use crate::core::clock::FixedClock;
use crate::error::CertLinkError;

/// A parsed time target for time-travel evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTarget {
    /// The resolved absolute timestamp.
    pub timestamp: DateTime<Utc>,
    /// The original expression provided by the user.
    pub expression: String,
}

impl TimeTarget {
    /// A clock frozen at this target.
    pub fn clock(&self) -> FixedClock {
        FixedClock::at(self.timestamp)
    }
}

/// Parse a time-travel expression relative to the real current time.
///
/// Supports the following formats:
/// - Relative: `+7d`, `-1h`, `+30m`, `+2w`, `+1y`, `-5s`
/// - Absolute RFC 3339: `2024-01-15T14:30:00Z`
/// - Absolute Unix epoch seconds: `1705312200`
///
/// # Errors
///
/// Returns an error if the expression doesn't match any known format.
pub fn parse_time_expression(expression: &str) -> Result<TimeTarget, CertLinkError> {
    parse_time_expression_at(expression, Utc::now())
}

/// Parse a time-travel expression, resolving relative offsets against `now`.
pub fn parse_time_expression_at(
    expression: &str,
    now: DateTime<Utc>,
) -> Result<TimeTarget, CertLinkError> {
    let trimmed = expression.trim();
    let invalid = |reason: String| CertLinkError::InvalidTimeExpression {
        expression: expression.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("expression is empty".to_string()));
    }

    let timestamp = if let Some(rest) = trimmed.strip_prefix('+') {
        let offset = parse_offset(rest).map_err(invalid)?;
        now.checked_add_signed(offset)
            .ok_or_else(|| invalid("offset is out of range".to_string()))?
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        let offset = parse_offset(rest).map_err(invalid)?;
        now.checked_sub_signed(offset)
            .ok_or_else(|| invalid("offset is out of range".to_string()))?
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = trimmed
            .parse()
            .map_err(|_| invalid("epoch seconds out of range".to_string()))?;
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| invalid("epoch seconds out of range".to_string()))?
    } else {
        DateTime::parse_from_rfc3339(trimmed)
            .map_err(|e| invalid(format!("not a relative offset, epoch, or RFC 3339 timestamp ({e})")))?
            .with_timezone(&Utc)
    };

    Ok(TimeTarget {
        timestamp,
        expression: expression.to_string(),
    })
}

/// Parse `<amount><unit>` into a duration.
fn parse_offset(body: &str) -> Result<Duration, String> {
    let split = body
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| "missing unit (expected one of s, m, h, d, w, y)".to_string())?;
    let (digits, unit) = body.split_at(split);

    if digits.is_empty() {
        return Err("missing amount before unit".to_string());
    }
    let amount: i64 = digits
        .parse()
        .map_err(|_| "amount is out of range".to_string())?;

    let seconds_per_unit: i64 = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 7 * 86_400,
        "y" => 365 * 86_400,
        other => return Err(format!("unknown unit '{other}'")),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| "amount is out of range".to_string())
}
