//! Handler for the `health` subcommand.
//!
//! Probes the backend health endpoint, retrying timeouts and network
//! errors with the default backoff.

use anyhow::Result;
use certlink::core::health::{HealthProbe, HealthStatus, RetryPolicy};
use serde_json::json;

use crate::cli::HealthArgs;
use crate::commands::read_env_var;
use crate::display::json_printer::print_json;

/// Execute the `health` subcommand with the given arguments.
///
/// Returns `Ok(true)` only when the backend answered with a 2xx status.
pub fn execute(args: &HealthArgs) -> Result<bool> {
    let mut probe = HealthProbe::new(&args.url)?.policy(RetryPolicy {
        max_attempts: args.attempts,
        ..RetryPolicy::default()
    });
    if let Some(name) = &args.bearer_env {
        probe = probe.bearer(read_env_var(name)?);
    }

    let report = probe.check()?;
    let (label, status, body) = match &report.status {
        HealthStatus::Healthy { status, body } => ("healthy", *status, body),
        HealthStatus::Unhealthy { status, body } => ("unhealthy", *status, body),
    };

    if args.json {
        print_json(&json!({
            "url": report.url,
            "state": label,
            "status": status,
            "attempts": report.attempts,
            "body": body,
        }));
    } else {
        println!(
            "{}: {} (HTTP {status}, {} attempt(s))",
            report.url,
            label.to_uppercase(),
            report.attempts
        );
    }

    Ok(report.status.is_healthy())
}
