//! JSON output for `--json` mode.

use serde_json::Value;

/// Render a JSON value with 2-space indentation.
pub fn to_pretty_string(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print a JSON value to stdout with 2-space indentation.
pub fn print_json(value: &Value) {
    println!("{}", to_pretty_string(value));
}
