//! Terminal display and formatting utilities.
//!
//! Handles JSON output and human-readable rendering of certificate link
//! claims and their expiry status.

pub mod json_printer;
pub mod token_status;
