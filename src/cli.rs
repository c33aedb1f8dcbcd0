//! CLI argument definitions for certlink.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! Argument structs that can hold a token, a share URL, or key material
//! implement custom `Debug` to redact those fields and prevent accidental
//! leakage through debug formatting, error chains, or logging.

use std::fmt;

use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

/// Mint, validate, and inspect signed, time-limited certificate share links.
#[derive(Debug, Parser)]
#[command(name = "certlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mint a certificate link token (and optionally a full share URL).
    Encode(EncodeArgs),

    /// Validate a certificate link token and show its claim.
    Decode(TokenArgs),

    /// Report whether a token is valid, expired, or unreadable.
    Status(TokenArgs),

    /// Validate a full share URL, checking its path against the token.
    Link(LinkArgs),

    /// Probe a backend health endpoint with retries.
    Health(HealthArgs),
}

/// Where to find the codec key.
#[derive(clap::Args)]
pub struct KeyArgs {
    /// Passphrase the codec key is derived from.
    ///
    /// WARNING: Passing secrets via CLI arguments may expose them in shell
    /// history. Prefer --key-env or the CERTLINK_KEY environment variable.
    #[arg(long, value_name = "PASSPHRASE", value_parser = parse_zeroizing_string)]
    pub key: Option<Zeroizing<String>>,

    /// Read the key passphrase from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub key_env: Option<String>,
}

/// Custom `Debug` that redacts the key passphrase.
impl fmt::Debug for KeyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyArgs")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("key_env", &self.key_env)
            .finish()
    }
}

/// Arguments for the `encode` subcommand.
#[derive(Debug, clap::Args)]
pub struct EncodeArgs {
    /// Organization identifier.
    pub organization_id: String,

    /// Program identifier.
    pub program_id: String,

    /// Certificate identifier.
    pub certificate_id: String,

    /// Days until the link expires (fractions allowed).
    #[arg(long, value_name = "DAYS", default_value_t = certlink::DEFAULT_EXPIRATION_DAYS)]
    pub days: f64,

    /// Print a full share URL rooted at this base URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub key: KeyArgs,
}

/// Arguments for the `decode` and `status` subcommands.
#[derive(clap::Args)]
pub struct TokenArgs {
    /// The token to check. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Evaluate expiry at a different time.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in RFC 3339 or Unix epoch format.
    #[arg(long, value_name = "EXPR")]
    pub time_travel: Option<String>,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub key: KeyArgs,
}

/// Custom `Debug` that redacts the token field to prevent accidental leakage.
impl fmt::Debug for TokenArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("time_travel", &self.time_travel)
            .field("json", &self.json)
            .field("key", &self.key)
            .finish()
    }
}

/// Arguments for the `link` subcommand.
#[derive(clap::Args)]
pub struct LinkArgs {
    /// The full share URL, e.g. https://host/#/certificate/ORG/PROGRAM/TOKEN
    pub url: String,

    /// Evaluate expiry at a different time (same formats as `decode`).
    #[arg(long, value_name = "EXPR")]
    pub time_travel: Option<String>,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub key: KeyArgs,
}

/// Custom `Debug` that redacts the URL, which embeds a token.
impl fmt::Debug for LinkArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkArgs")
            .field("url", &"[REDACTED]")
            .field("time_travel", &self.time_travel)
            .field("json", &self.json)
            .field("key", &self.key)
            .finish()
    }
}

/// Arguments for the `health` subcommand.
#[derive(Debug, clap::Args)]
pub struct HealthArgs {
    /// Health endpoint URL (http or https).
    pub url: String,

    /// Read a bearer token for the request from this environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub bearer_env: Option<String>,

    /// Total attempts before giving up.
    #[arg(long, value_name = "N", default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub attempts: u32,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Parse a string into a `Zeroizing<String>` for secure CLI arguments.
fn parse_zeroizing_string(s: &str) -> Result<Zeroizing<String>, std::convert::Infallible> {
    Ok(Zeroizing::new(s.to_string()))
}
