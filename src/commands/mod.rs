//! Command handlers for each CLI subcommand.
//!
//! Each subcommand is implemented in its own module and exposes
//! a single `execute` function that receives the parsed arguments and
//! returns whether the command succeeded. Input resolution shared by
//! several commands (key, token, clock) lives here.

pub mod decode;
pub mod encode;
pub mod health;
pub mod link;
pub mod status;

use std::io::{IsTerminal, Read};

use certlink::core::time_travel::parse_time_expression;
use certlink::{CertLinkError, Clock, CodecKey, SystemClock, TokenCodec};
use zeroize::Zeroizing;

use crate::cli::KeyArgs;

/// Environment variable consulted when no key flag is given.
pub const DEFAULT_KEY_ENV: &str = "CERTLINK_KEY";

/// Resolve the codec key from `--key`, `--key-env`, or `CERTLINK_KEY`.
pub fn resolve_key(args: &KeyArgs) -> Result<CodecKey, CertLinkError> {
    if let Some(passphrase) = &args.key {
        return CodecKey::from_passphrase(passphrase);
    }
    if let Some(name) = &args.key_env {
        let passphrase = read_env_var(name)?;
        return CodecKey::from_passphrase(&passphrase);
    }
    match std::env::var(DEFAULT_KEY_ENV) {
        Ok(value) if !value.is_empty() => CodecKey::from_passphrase(&Zeroizing::new(value)),
        _ => Err(CertLinkError::NoKeyProvided),
    }
}

/// Resolve the token from the positional argument, an environment
/// variable, or stdin, in that order. Surrounding whitespace is trimmed.
pub fn resolve_token(
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<String, CertLinkError> {
    let raw = match (token, token_env) {
        (Some(token), _) => token.to_string(),
        (None, Some(name)) => read_env_var(name)?.to_string(),
        (None, None) => read_stdin()?,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CertLinkError::NoTokenProvided);
    }
    Ok(trimmed.to_string())
}

/// Build a codec whose clock is either the wall clock or a time-travel
/// target.
pub fn build_codec(
    key: &CodecKey,
    time_travel: Option<&str>,
) -> Result<TokenCodec<Box<dyn Clock>>, CertLinkError> {
    let clock: Box<dyn Clock> = match time_travel {
        Some(expression) => {
            let target = parse_time_expression(expression)?;
            tracing::info!(at = %target.timestamp.to_rfc3339(), "evaluating at simulated time");
            Box::new(target.clock())
        }
        None => Box::new(SystemClock),
    };
    Ok(TokenCodec::with_clock(key, clock))
}

/// Read an environment variable after validating its name.
pub fn read_env_var(name: &str) -> Result<Zeroizing<String>, CertLinkError> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(CertLinkError::InvalidEnvVarName {
            name: name.to_string(),
        });
    }
    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| CertLinkError::EnvVarNotFound {
            name: name.to_string(),
        })
}

/// Read a token from stdin unless stdin is an interactive terminal.
fn read_stdin() -> Result<String, CertLinkError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(CertLinkError::NoTokenProvided);
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .map_err(|_| CertLinkError::NoTokenProvided)?;
    Ok(buf)
}
