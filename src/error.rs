//! Domain error types for certlink.
//!
//! Operational errors live in [`CertLinkError`] and are converted to
//! user-friendly messages at the CLI boundary. Token validation outcomes
//! are a separate, closed set ([`DecodeFailure`]) because they are data
//! returned to callers, not faults.

use thiserror::Error;

/// Why a certificate link token was rejected.
///
/// Every variant is terminal: the caller must mint a new token with
/// `encode`. End users should only ever see a generic "link is no longer
/// valid" message; the variant is for logs and for callers that want to
/// word "old link" differently from "broken link".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    /// The string is not validly percent-encoded.
    #[error("token is not validly percent-encoded")]
    Malformed,

    /// Decryption or claim parsing failed. Indistinguishable from tampering.
    #[error("token could not be decrypted or does not contain a valid claim")]
    Invalid,

    /// The claim is intact but its expiry has passed.
    #[error("token has expired")]
    Expired,
}

impl DecodeFailure {
    /// Short machine-readable tag, used in JSON output and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }
}

/// Errors that can occur while minting links, resolving inputs, or probing
/// the backend.
#[derive(Debug, Error)]
pub enum CertLinkError {
    /// One of the claim identifiers was empty.
    #[error("{field} must not be empty")]
    EmptyIdentifier {
        /// Which identifier was empty (e.g., "organization id").
        field: &'static str,
    },

    /// The requested expiry window is not a positive, finite number of days.
    #[error("invalid expiration window '{days}': must be a positive number of days")]
    InvalidExpiryWindow {
        /// The rejected value.
        days: f64,
    },

    /// The AEAD cipher refused to encrypt the claim.
    #[error("failed to encrypt certificate claim")]
    Encryption,

    /// Key material could not be used.
    #[error("invalid codec key: {reason}")]
    InvalidKey {
        /// Description of the problem.
        reason: String,
    },

    /// No key was provided via any input method.
    #[error("no codec key provided: pass --key, --key-env, or set CERTLINK_KEY")]
    NoKeyProvided,

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// The environment variable name cannot be looked up safely.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },

    /// Failed to parse a time-travel expression.
    #[error("invalid time expression '{expression}': {reason}")]
    InvalidTimeExpression {
        /// The time expression that failed to parse.
        expression: String,
        /// Description of the parsing failure.
        reason: String,
    },

    /// The URL is not a certificate share link.
    #[error("invalid share link '{url}': {reason}")]
    InvalidShareLink {
        /// The (sanitized) URL.
        url: String,
        /// Description of the problem.
        reason: String,
    },

    /// The backend health endpoint could not be reached.
    #[error("health check of '{url}' failed after {attempts} attempt(s): {reason}")]
    HealthCheckFailed {
        /// The (sanitized) health endpoint URL.
        url: String,
        /// How many attempts were made.
        attempts: u32,
        /// Description of the last failure.
        reason: String,
    },
}
