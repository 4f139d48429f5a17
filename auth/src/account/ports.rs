use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::errors::AccountError;
use super::models::Account;
use super::models::NewAccount;
use super::models::StoredCredential;

/// Persistence for accounts and their credential digests.
///
/// The digest is an opaque string to the store.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Arguments
    /// * `account` - Username, email, and encoded password digest
    ///
    /// # Returns
    /// Created account with its assigned identifier
    ///
    /// # Errors
    /// * `AlreadyExists` - Username or email is taken
    /// * `Store` - Storage operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;

    /// Retrieve the account whose username or email equals `login`.
    ///
    /// # Returns
    /// Optional stored credential (None if no account matches)
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn find_by_login(&self, login: &str) -> Result<Option<StoredCredential>, AccountError>;

    /// Stamp the account's last successful login.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn record_login(&self, id: u64, at: DateTime<Utc>) -> Result<(), AccountError>;
}
