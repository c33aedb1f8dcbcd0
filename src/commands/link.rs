//! Handler for the `link` subcommand.
//!
//! Parses a full share URL and validates it the way the certificate
//! viewer does: the token must decode and its organization and program
//! must match the URL path.

use anyhow::Result;
use certlink::{Clock, parse_share_link};
use serde_json::json;

use crate::cli::LinkArgs;
use crate::commands::{build_codec, resolve_key};
use crate::display::json_printer::print_json;
use crate::display::token_status::{GENERIC_INVALID_MESSAGE, claim_to_json, display_claim};

/// Execute the `link` subcommand with the given arguments.
///
/// Returns `Ok(false)` when the link was rejected.
pub fn execute(args: &LinkArgs) -> Result<bool> {
    let link = parse_share_link(&args.url)?;
    let key = resolve_key(&args.key)?;
    let codec = build_codec(&key, args.time_travel.as_deref())?;
    let now = codec.clock().now_millis();

    match link.verify(&codec) {
        Ok(claim) => {
            if args.json {
                print_json(&claim_to_json(&claim, now));
            } else {
                display_claim(&claim, now);
            }
            Ok(true)
        }
        Err(failure) => {
            tracing::info!(reason = failure.as_str(), "certificate share link rejected");
            if args.json {
                print_json(&json!({ "valid": false }));
            }
            eprintln!("{GENERIC_INVALID_MESSAGE}");
            Ok(false)
        }
    }
}
