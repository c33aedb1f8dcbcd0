//! certlink: signed, time-limited certificate share links.
//!
//! A [`TokenCodec`] binds an (organization, program, certificate) triple
//! and a validity window into an opaque, URL-safe token encrypted under an
//! injected [`CodecKey`]. Decoding is total: untrusted input yields either a
//! [`CertificateLinkClaim`] or a [`DecodeFailure`], never a panic.
//!
//! ```
//! use certlink::{CodecKey, TokenCodec};
//!
//! let key = CodecKey::from_passphrase("server-only secret").unwrap();
//! let codec = TokenCodec::new(&key);
//!
//! let token = codec.encode("org1", "prog1", "cert1", 30.0).unwrap();
//! let claim = codec.decode(token.as_str()).unwrap();
//! assert_eq!(claim.certificate_id, "cert1");
//! assert_eq!(codec.is_expired(token.as_str()), Some(false));
//! assert_eq!(codec.is_expired("garbage"), None);
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;

pub use crate::core::claim::{CertificateLinkClaim, DEFAULT_EXPIRATION_DAYS};
pub use crate::core::clock::{Clock, FixedClock, SystemClock};
pub use crate::core::codec::{Token, TokenCodec};
pub use crate::core::key::CodecKey;
pub use crate::core::link::{ShareLink, format_share_link, parse_share_link, replace_control_chars};
pub use crate::error::{CertLinkError, DecodeFailure};
