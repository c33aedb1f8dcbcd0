//! Handler for the `status` subcommand.
//!
//! Reports one of three states for a token: `valid`, `expired`, or
//! `unreadable`. Intended for countdowns and support tooling, not for
//! deciding whether to show a certificate.

use anyhow::Result;
use serde_json::json;

use crate::cli::TokenArgs;
use crate::commands::{build_codec, resolve_key, resolve_token};
use crate::display::json_printer::print_json;
use crate::display::token_status::format_duration;

/// Execute the `status` subcommand with the given arguments.
///
/// Returns `Ok(true)` only for a valid, unexpired token.
pub fn execute(args: &TokenArgs) -> Result<bool> {
    let token = resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let key = resolve_key(&args.key)?;
    let codec = build_codec(&key, args.time_travel.as_deref())?;

    let expired = codec.is_expired(&token);
    let remaining = codec.time_remaining(&token);
    let state = match expired {
        Some(false) => "valid",
        Some(true) => "expired",
        None => "unreadable",
    };

    if args.json {
        print_json(&json!({
            "state": state,
            "expired": expired,
            "remainingMs": remaining,
        }));
    } else {
        match remaining {
            Some(ms) if expired == Some(false) => {
                println!("{state} (expires in {})", format_duration(ms));
            }
            _ => println!("{state}"),
        }
    }

    Ok(expired == Some(false))
}
