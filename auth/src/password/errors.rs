use std::fmt;

use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Invalid key derivation parameters: {0}")]
    InvalidParams(String),

    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Malformed credential digest: {0}")]
    MalformedDigest(#[from] MalformedDigestError),
}

/// Which half of a `salt:hash` digest failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestSegment {
    Salt,
    Hash,
}

impl fmt::Display for DigestSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestSegment::Salt => f.write_str("salt"),
            DigestSegment::Hash => f.write_str("hash"),
        }
    }
}

/// Stored digest could not be interpreted.
///
/// Format and decoding failures are kept apart for diagnostics; callers
/// treat them all as a failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDigestError {
    #[error("expected 2 segments separated by ':', found {0}")]
    SegmentCount(usize),

    #[error("{segment} segment is not valid unpadded base64: {source}")]
    Encoding {
        segment: DigestSegment,
        source: base64::DecodeError,
    },

    #[error("salt is {actual} bytes, minimum is {min}")]
    SaltTooShort { min: usize, actual: usize },
}
