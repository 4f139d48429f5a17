use thiserror::Error;

/// Error type for token issuance.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Invalid token expiry: {0}")]
    InvalidExpiry(#[from] ExpiryError),

    #[error("Token signing failed: {0}")]
    Signing(#[from] SigningError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    #[error("no expiry field is set")]
    Unspecified,

    #[error("expiry of {0} seconds is out of range")]
    OutOfRange(u64),
}

/// The deployment cannot sign tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("signing key is empty")]
    EmptyKey,

    #[error("algorithm {0} is not an HMAC algorithm")]
    UnsupportedAlgorithm(String),

    #[error("signing primitive rejected input: {0}")]
    Rejected(String),
}
