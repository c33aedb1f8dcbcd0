//! Symmetric key material for the token codec.
//!
//! Keys are injected by the caller rather than compiled in, so they can be
//! rotated and kept server-side. Material is zeroized on drop.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CertLinkError;

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Salt for passphrase derivation. Changing it invalidates every token.
const PASSPHRASE_SALT: &[u8] = b"certlink.passphrase.v1";

/// HKDF info string binding derived keys to this token scheme.
const KEY_INFO: &[u8] = b"certificate-link-token aes-256-gcm";

/// A 256-bit key for the certificate link cipher.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CodecKey([u8; KEY_LEN]);

impl CodecKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a key from an operator-supplied passphrase using HKDF-SHA256.
    ///
    /// The same passphrase always yields the same key, so every process
    /// configured with it can validate the others' tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CertLinkError::InvalidKey`] if the passphrase is empty.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, CertLinkError> {
        if passphrase.is_empty() {
            return Err(CertLinkError::InvalidKey {
                reason: "passphrase must not be empty".to_string(),
            });
        }

        let hk = Hkdf::<Sha256>::new(Some(PASSPHRASE_SALT), passphrase.as_bytes());
        let mut okm = [0u8; KEY_LEN];
        hk.expand(KEY_INFO, &mut okm)
            .map_err(|_| CertLinkError::InvalidKey {
                reason: "key derivation failed".to_string(),
            })?;

        let key = Self(okm);
        okm.zeroize();
        Ok(key)
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Custom `Debug` that never prints key material.
impl fmt::Debug for CodecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CodecKey([REDACTED])")
    }
}
