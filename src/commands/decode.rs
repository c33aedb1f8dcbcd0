//! Handler for the `decode` subcommand.
//!
//! Validates a certificate link token and prints its claim. Every
//! rejection, whatever the cause, is reported with the same generic
//! message; the specific reason is only logged.

use anyhow::Result;
use certlink::Clock;
use serde_json::json;

use crate::cli::TokenArgs;
use crate::commands::{build_codec, resolve_key, resolve_token};
use crate::display::json_printer::print_json;
use crate::display::token_status::{GENERIC_INVALID_MESSAGE, claim_to_json, display_claim};

/// Execute the `decode` subcommand with the given arguments.
///
/// Returns `Ok(false)` when the token was rejected.
pub fn execute(args: &TokenArgs) -> Result<bool> {
    let token = resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let key = resolve_key(&args.key)?;
    let codec = build_codec(&key, args.time_travel.as_deref())?;
    let now = codec.clock().now_millis();

    match codec.decode(&token) {
        Ok(claim) => {
            if args.json {
                print_json(&claim_to_json(&claim, now));
            } else {
                display_claim(&claim, now);
            }
            Ok(true)
        }
        Err(failure) => {
            tracing::info!(reason = failure.as_str(), "certificate link rejected");
            if args.json {
                print_json(&json!({ "valid": false }));
            }
            eprintln!("{GENERIC_INVALID_MESSAGE}");
            Ok(false)
        }
    }
}
