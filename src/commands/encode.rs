//! Handler for the `encode` subcommand.
//!
//! Mints a certificate link token for an organization, program, and
//! certificate, optionally wrapping it in a full share URL.

use anyhow::Result;
use certlink::{TokenCodec, format_share_link};
use serde_json::json;

use crate::cli::EncodeArgs;
use crate::commands::resolve_key;
use crate::display::json_printer::print_json;

/// Execute the `encode` subcommand with the given arguments.
pub fn execute(args: &EncodeArgs) -> Result<bool> {
    let key = resolve_key(&args.key)?;
    let codec = TokenCodec::new(&key);

    let token = codec.encode(
        &args.organization_id,
        &args.program_id,
        &args.certificate_id,
        args.days,
    )?;
    let url = args
        .base_url
        .as_deref()
        .map(|base| format_share_link(base, &args.organization_id, &args.program_id, &token));

    if args.json {
        print_json(&json!({
            "token": token.as_str(),
            "url": url,
            "expirationDays": args.days,
        }));
    } else {
        println!("{token}");
        if let Some(url) = url {
            println!("{url}");
        }
    }

    Ok(true)
}
