use thiserror::Error;

use crate::authenticator::AuthenticationError;
use crate::password::PasswordError;
use crate::token::TokenError;

/// Top-level error for signup and login.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    #[error("Authentication unavailable: {0}")]
    Unavailable(String),

    // Infrastructure errors
    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthenticationError> for AccountError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials
            | AuthenticationError::Password(PasswordError::MalformedDigest(_)) => {
                AccountError::InvalidCredentials
            }
            AuthenticationError::Token(TokenError::Signing(e)) => {
                AccountError::Unavailable(e.to_string())
            }
            other => AccountError::Internal(other.to_string()),
        }
    }
}
