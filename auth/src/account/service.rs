use std::sync::Arc;

use chrono::Utc;

use super::errors::AccountError;
use super::models::Account;
use super::models::LogInCommand;
use super::models::LoginOutcome;
use super::models::NewAccount;
use super::models::SignUpCommand;
use super::ports::CredentialStore;
use crate::authenticator::AuthenticationError;
use crate::authenticator::Authenticator;
use crate::password::PasswordError;

/// Signup and login flows on top of an [`Authenticator`].
///
/// Owns no HTTP semantics; handlers translate [`AccountError`] into responses.
pub struct AccountService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    decoy_digest: String,
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Shared hasher and token issuer
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        let decoy_digest = authenticator.decoy_digest();

        Self {
            store,
            authenticator,
            decoy_digest,
        }
    }

    /// Register an account, storing only the password digest.
    ///
    /// # Errors
    /// * `AlreadyExists` - Username or email is taken
    /// * `Internal` - Hashing failed
    /// * `Store` - Storage operation failed
    pub async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError> {
        let password_digest = self.authenticator.hash_password(&command.password).await?;

        let account = self
            .store
            .create(NewAccount {
                username: command.username,
                email: command.email,
                password_digest,
            })
            .await?;

        tracing::info!(account_id = account.id, "Account created");

        Ok(account)
    }

    /// Check a login attempt and issue a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown login, wrong password, or unusable stored digest
    /// * `Unavailable` - Tokens cannot be signed
    /// * `Internal` - Hashing failed
    /// * `Store` - Storage operation failed
    pub async fn log_in(&self, command: LogInCommand) -> Result<LoginOutcome, AccountError> {
        let Some(credential) = self.store.find_by_login(&command.login).await? else {
            // Unknown logins pay the same key derivation as a wrong password
            if let Err(e) = self
                .authenticator
                .verify_password(&command.password, &self.decoy_digest)
                .await
            {
                tracing::warn!(error = %e, "Decoy verification failed");
            }
            tracing::debug!("Unknown login");
            return Err(AccountError::InvalidCredentials);
        };

        let account_id = credential.account.id;

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &credential.password_digest,
                account_id,
                credential.privileged,
            )
            .await
            .map_err(|e| {
                match &e {
                    AuthenticationError::Password(PasswordError::MalformedDigest(cause)) => {
                        tracing::error!(
                            account_id,
                            error = %cause,
                            "Stored credential digest is malformed"
                        );
                    }
                    AuthenticationError::InvalidCredentials => {
                        tracing::debug!(account_id, "Password mismatch");
                    }
                    other => {
                        tracing::error!(account_id, error = %other, "Authentication failed");
                    }
                }
                AccountError::from(e)
            })?;

        let now = Utc::now();
        self.store.record_login(account_id, now).await?;

        let mut account = credential.account;
        account.last_login = Some(now);

        Ok(LoginOutcome {
            account,
            access_token: result.access_token,
        })
    }
}
