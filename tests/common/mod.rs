//! Shared test fixtures and helper utilities.
//!
//! Mints certificate link tokens with known claims for use in the
//! integration tests. Not every test binary uses every fixture.
#![allow(dead_code)]

use certlink::{CodecKey, FixedClock, Token, TokenCodec};

/// Passphrase the CLI tests hand to the binary via `CERTLINK_KEY`.
pub const TEST_KEY: &str = "integration-test-key";

/// A different passphrase, simulating a rotated key.
pub const OTHER_KEY: &str = "rotated-integration-key";

/// A string that is not a token at all.
pub const INVALID_TOKEN: &str = "not-a-token";

/// A token with a dangling percent escape.
pub const MALFORMED_TOKEN: &str = "abc%2";

/// 2024-01-15T09:50:00Z in milliseconds.
pub const ISSUED_2024: i64 = 1_705_312_200_000;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// The codec key derived from [`TEST_KEY`].
pub fn test_key() -> CodecKey {
    CodecKey::from_passphrase(TEST_KEY).unwrap()
}

/// A codec under [`TEST_KEY`] with its clock frozen at `now`.
pub fn codec_at(now: i64) -> TokenCodec<FixedClock> {
    TokenCodec::with_clock(&test_key(), FixedClock(now))
}

/// A token for `org1/prog1/cert1` that is valid right now for 30 days.
pub fn fresh_token() -> Token {
    TokenCodec::new(&test_key())
        .encode("org1", "prog1", "cert1", 30.0)
        .unwrap()
}

/// A token issued in January 2024 with a one-day window; long expired.
pub fn expired_token() -> Token {
    codec_at(ISSUED_2024)
        .encode("org1", "prog1", "cert1", 1.0)
        .unwrap()
}

/// A currently valid token minted under [`OTHER_KEY`].
pub fn other_key_token() -> Token {
    TokenCodec::new(&CodecKey::from_passphrase(OTHER_KEY).unwrap())
        .encode("org1", "prog1", "cert1", 30.0)
        .unwrap()
}
