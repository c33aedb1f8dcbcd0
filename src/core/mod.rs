//! Core logic for certificate links.
//!
//! Everything here is independent of the CLI: the token codec and its key
//! and clock seams, share-link parsing, time-travel parsing, and the
//! backend health probe.

pub mod claim;
pub mod clock;
pub mod codec;
pub mod health;
pub mod key;
pub mod link;
pub mod time_travel;
