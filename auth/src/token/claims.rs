use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::ExpiryError;
use super::expiry::ExpirySpec;

/// Claims carried by an issued bearer token.
///
/// Serialized as `{"uid": .., "admin": .., "exp": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account identifier)
    #[serde(rename = "uid")]
    pub subject_id: u64,

    /// Whether the subject holds administrative privileges
    #[serde(rename = "admin")]
    pub privileged: bool,

    /// Expiration time (Unix timestamp, seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl TokenClaims {
    /// Build claims expiring `expiry` after `now`.
    ///
    /// # Errors
    /// * `Unspecified` - No expiry field is set
    /// * `OutOfRange` - The expiry overflows the timestamp range
    pub fn new(
        subject_id: u64,
        privileged: bool,
        expiry: &ExpirySpec,
        now: DateTime<Utc>,
    ) -> Result<Self, ExpiryError> {
        let duration = expiry.resolve()?;
        let expires_at = now
            .checked_add_signed(duration)
            .ok_or(ExpiryError::OutOfRange(duration.num_seconds().unsigned_abs()))?;

        Ok(Self {
            subject_id,
            privileged,
            expires_at: expires_at.timestamp(),
        })
    }
}
