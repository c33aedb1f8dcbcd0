//! Certificate link token encoding and validation.
//!
//! A token is `percent_encode(base64(nonce || AES-256-GCM(claim_json)))`.
//! The encoder side runs in trusted link-generation flows; the decoder
//! side takes attacker-controlled URL segments, so every decode path is
//! total: any input yields either a claim or a [`DecodeFailure`].

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::claim::{CertificateLinkClaim, DEFAULT_EXPIRATION_DAYS, window_millis};
use crate::core::clock::{Clock, SystemClock};
use crate::core::key::CodecKey;
use crate::error::{CertLinkError, DecodeFailure};

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Associated data binding ciphertexts to this token format.
const TOKEN_AAD: &[u8] = b"certlink/v1";

/// An opaque, URL-path-safe certificate link token.
///
/// Implements a custom `Debug` that redacts the value: possession of a
/// token grants access to the certificate it names.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Borrow the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

/// Mints and validates certificate link tokens under one key.
///
/// Stateless apart from the clock; safe to share across threads.
#[derive(Clone)]
pub struct TokenCodec<C = SystemClock> {
    cipher: Aes256Gcm,
    clock: C,
}

impl TokenCodec<SystemClock> {
    /// Create a codec that reads the real wall clock.
    pub fn new(key: &CodecKey) -> Self {
        Self::with_clock(key, SystemClock)
    }
}

impl<C: Clock> TokenCodec<C> {
    /// Create a codec with an explicit clock.
    pub fn with_clock(key: &CodecKey, clock: C) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.as_bytes().into()),
            clock,
        }
    }

    /// The clock this codec evaluates expiry against.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mint a token with the default 365-day window.
    ///
    /// # Errors
    ///
    /// See [`TokenCodec::encode`].
    pub fn encode_default(
        &self,
        organization_id: &str,
        program_id: &str,
        certificate_id: &str,
    ) -> Result<Token, CertLinkError> {
        self.encode(
            organization_id,
            program_id,
            certificate_id,
            DEFAULT_EXPIRATION_DAYS,
        )
    }

    /// Mint a token valid for `expiration_days` (fractions allowed) from now.
    ///
    /// # Errors
    ///
    /// Returns an error if any identifier is empty, if the window is not a
    /// positive finite number of days, or if encryption fails.
    pub fn encode(
        &self,
        organization_id: &str,
        program_id: &str,
        certificate_id: &str,
        expiration_days: f64,
    ) -> Result<Token, CertLinkError> {
        for (field, value) in [
            ("organization id", organization_id),
            ("program id", program_id),
            ("certificate id", certificate_id),
        ] {
            if value.is_empty() {
                return Err(CertLinkError::EmptyIdentifier { field });
            }
        }

        let window = window_millis(expiration_days).ok_or(CertLinkError::InvalidExpiryWindow {
            days: expiration_days,
        })?;
        let issued_at = self.clock.now_millis();
        let expires_at = issued_at
            .checked_add(window)
            .ok_or(CertLinkError::InvalidExpiryWindow {
                days: expiration_days,
            })?;

        let claim = CertificateLinkClaim {
            organization_id: organization_id.to_string(),
            program_id: program_id.to_string(),
            certificate_id: certificate_id.to_string(),
            issued_at,
            expires_at,
        };
        let plaintext = serde_json::to_vec(&claim).map_err(|_| CertLinkError::Encryption)?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: TOKEN_AAD,
                },
            )
            .map_err(|_| CertLinkError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        let encoded = STANDARD.encode(&sealed);
        let token = urlencoding::encode(&encoded).into_owned();

        tracing::debug!(
            organization_id = %claim.organization_id,
            program_id = %claim.program_id,
            expires_at = claim.expires_at,
            "minted certificate link token"
        );

        Ok(Token(token))
    }

    /// Validate a token and return its claim if it is intact and unexpired.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFailure::Malformed`] for bad percent escapes,
    /// [`DecodeFailure::Invalid`] for anything that fails to decrypt or
    /// parse, and [`DecodeFailure::Expired`] once `now > expires_at`.
    pub fn decode(&self, token: &str) -> Result<CertificateLinkClaim, DecodeFailure> {
        let result = self.inspect(token).and_then(|claim| {
            if claim.is_expired_at(self.clock.now_millis()) {
                Err(DecodeFailure::Expired)
            } else {
                Ok(claim)
            }
        });

        if let Err(failure) = &result {
            tracing::debug!(reason = failure.as_str(), "rejected certificate link token");
        }
        result
    }

    /// Milliseconds until the token expires (zero once expired), or `None`
    /// if the token is unreadable.
    ///
    /// For countdown display only; authorize through [`TokenCodec::decode`].
    pub fn time_remaining(&self, token: &str) -> Option<i64> {
        self.inspect(token)
            .ok()
            .map(|claim| claim.remaining_at(self.clock.now_millis()))
    }

    /// `Some(true)` if expired, `Some(false)` if still valid, `None` if the
    /// token is unreadable.
    pub fn is_expired(&self, token: &str) -> Option<bool> {
        self.inspect(token)
            .ok()
            .map(|claim| claim.is_expired_at(self.clock.now_millis()))
    }

    /// Decrypt and parse a token without checking expiry.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFailure::Malformed`] or [`DecodeFailure::Invalid`];
    /// never [`DecodeFailure::Expired`].
    pub fn inspect(&self, token: &str) -> Result<CertificateLinkClaim, DecodeFailure> {
        let unescaped = percent_decode(token)?;
        let sealed = STANDARD
            .decode(unescaped.as_bytes())
            .map_err(|_| DecodeFailure::Invalid)?;

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(DecodeFailure::Invalid);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_AAD,
                },
            )
            .map_err(|_| DecodeFailure::Invalid)?;

        serde_json::from_slice(&plaintext).map_err(|_| DecodeFailure::Invalid)
    }
}

/// Custom `Debug` that never exposes the cipher state.
impl<C: fmt::Debug> fmt::Debug for TokenCodec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("cipher", &"[REDACTED]")
            .field("clock", &self.clock)
            .finish()
    }
}

/// Strict percent-decoding: every `%` must start a two-hex-digit escape and
/// the unescaped bytes must be UTF-8.
fn percent_decode(input: &str) -> Result<String, DecodeFailure> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).ok_or(DecodeFailure::Malformed)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return Err(DecodeFailure::Malformed);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(input)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeFailure::Malformed)
}
