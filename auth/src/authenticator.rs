use std::sync::Arc;
use std::time::Instant;

use config::ConfigError;
use tokio::sync::Semaphore;

use crate::config::AuthConfig;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::ExpirySpec;
use crate::token::TokenError;
use crate::token::TokenIssuer;

/// Authentication coordinator combining password verification and token issuance.
///
/// Key derivation runs on the blocking thread pool, and at most
/// `max_concurrent_hashes` derivations are in flight at once since each one
/// allocates the full configured memory cost. A derivation whose caller stops
/// waiting still runs to completion and keeps its permit until it does.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    hash_permits: Arc<Semaphore>,
    session_ttl: ExpirySpec,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Hashing worker unavailable: {0}")]
    WorkerUnavailable(String),
}

impl Authenticator {
    /// Create a new authenticator from already-built components.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher bound to the deployment's KDF parameters
    /// * `token_issuer` - Issuer bound to the signing key
    /// * `max_concurrent_hashes` - Upper bound on simultaneous derivations (min 1)
    /// * `session_ttl` - Lifetime of tokens issued by `authenticate`
    pub fn new(
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
        max_concurrent_hashes: usize,
        session_ttl: ExpirySpec,
    ) -> Self {
        Self {
            password_hasher,
            token_issuer,
            hash_permits: Arc::new(Semaphore::new(max_concurrent_hashes.max(1))),
            session_ttl,
        }
    }

    /// Validate configuration and build an authenticator from it.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Configuration failed validation
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let password_hasher = config.validated_password_hasher()?;
        let token_issuer = TokenIssuer::new(config.token.secret.as_bytes())
            .with_algorithm(config.token.algorithm);

        Ok(Self::new(
            password_hasher,
            token_issuer,
            config.password.max_concurrent_hashes,
            config.token.session_ttl,
        ))
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `Password` - Random source or key derivation failed
    /// * `WorkerUnavailable` - The blocking worker could not run the job
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthenticationError> {
        let hasher = self.password_hasher.clone();
        let password = password.as_bytes().to_vec();

        let started = Instant::now();
        let digest = self.run_blocking(move || hasher.hash(&password)).await??;
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Password hashed"
        );

        Ok(digest)
    }

    /// Verify a password against a stored digest.
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `Password` - Digest is malformed or key derivation failed
    /// * `WorkerUnavailable` - The blocking worker could not run the job
    pub async fn verify_password(
        &self,
        password: &str,
        stored_digest: &str,
    ) -> Result<bool, AuthenticationError> {
        let hasher = self.password_hasher.clone();
        let password = password.as_bytes().to_vec();
        let stored_digest = stored_digest.to_string();

        let is_valid = self
            .run_blocking(move || hasher.verify(&password, &stored_digest))
            .await??;

        Ok(is_valid)
    }

    /// Well-formed digest that never matches, for burning the same key
    /// derivation cost when there is no stored digest to check.
    pub fn decoy_digest(&self) -> String {
        self.password_hasher.decoy_digest()
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_digest` - Digest previously produced by `hash_password`
    /// * `subject_id` - Account identifier for the token
    /// * `privileged` - Admin flag for the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Digest is malformed or key derivation failed
    /// * `Token` - Token issuance failed
    /// * `WorkerUnavailable` - The blocking worker could not run the job
    pub async fn authenticate(
        &self,
        password: &str,
        stored_digest: &str,
        subject_id: u64,
        privileged: bool,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_digest).await? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject_id, privileged, &self.session_ttl)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `InvalidExpiry` - No expiry field set, or the expiry overflows
    /// * `Signing` - The deployment cannot sign tokens
    pub fn issue_token(
        &self,
        subject_id: u64,
        privileged: bool,
        expiry: &ExpirySpec,
    ) -> Result<String, TokenError> {
        self.token_issuer.issue(subject_id, privileged, expiry)
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, AuthenticationError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.hash_permits)
            .acquire_owned()
            .await
            .map_err(|e| AuthenticationError::WorkerUnavailable(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| AuthenticationError::WorkerUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use jsonwebtoken::decode;
    use jsonwebtoken::Algorithm;
    use jsonwebtoken::DecodingKey;
    use jsonwebtoken::Validation;

    use super::*;
    use crate::config::PasswordConfig;
    use crate::config::TokenConfig;
    use crate::password::KdfParams;
    use crate::password::MalformedDigestError;
    use crate::token::SigningError;
    use crate::token::TokenClaims;

    const SECRET: &str = "test_secret_key_at_least_32_bytes!";

    fn test_config(max_concurrent_hashes: usize) -> AuthConfig {
        AuthConfig {
            password: PasswordConfig {
                salt_length: 16,
                kdf: KdfParams {
                    memory_cost: 1024,
                    time_cost: 1,
                    parallelism: 1,
                    output_length: 32,
                },
                max_concurrent_hashes,
            },
            token: TokenConfig {
                secret: SECRET.to_string(),
                algorithm: Algorithm::HS256,
                session_ttl: ExpirySpec::minutes(30),
            },
        }
    }

    fn test_authenticator() -> Authenticator {
        Authenticator::from_config(&test_config(2)).expect("Failed to build authenticator")
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let authenticator = test_authenticator();

        let password = "my_password";
        let digest = authenticator
            .hash_password(password)
            .await
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &digest, 7, false)
            .await
            .expect("Authentication failed");

        let claims = decode::<TokenClaims>(
            &result.access_token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("Token validation failed")
        .claims;
        assert_eq!(claims.subject_id, 7);
        assert!(!claims.privileged);
        let expected = chrono::Utc::now().timestamp() + 1800;
        assert!((claims.expires_at - expected).abs() <= 1);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_password() {
        let authenticator = test_authenticator();

        let digest = authenticator.hash_password("my_password").await.unwrap();

        let result = authenticator
            .authenticate("wrong_password", &digest, 7, false)
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_digest() {
        let authenticator = test_authenticator();

        let result = authenticator
            .authenticate("my_password", "plaintext-password", 7, false)
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::Password(
                PasswordError::MalformedDigest(MalformedDigestError::SegmentCount(1))
            ))
        ));
    }

    #[tokio::test]
    async fn test_issue_token_empty_key() {
        let hasher = PasswordHasher::new(test_config(1).password.kdf, 16).unwrap();
        let authenticator =
            Authenticator::new(hasher, TokenIssuer::new(b""), 1, ExpirySpec::minutes(30));

        let result = authenticator.issue_token(7, false, &ExpirySpec::minutes(30));
        assert!(matches!(
            result,
            Err(TokenError::Signing(SigningError::EmptyKey))
        ));
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_salt_length() {
        use base64::engine::general_purpose::STANDARD_NO_PAD;
        use base64::Engine;

        let mut config = test_config(1);
        config.password.salt_length = 24;
        let authenticator = Authenticator::from_config(&config).unwrap();

        let digest = authenticator.hash_password("password").await.unwrap();
        let (salt, _) = digest.split_once(':').unwrap();
        assert_eq!(STANDARD_NO_PAD.decode(salt).unwrap().len(), 24);

        let decoy = authenticator.decoy_digest();
        let (salt, _) = decoy.split_once(':').unwrap();
        assert_eq!(STANDARD_NO_PAD.decode(salt).unwrap().len(), 24);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = test_config(1);
        config.token.secret.clear();

        assert!(Authenticator::from_config(&config).is_err());

        let mut config = test_config(1);
        config.password.max_concurrent_hashes = 0;
        assert!(Authenticator::from_config(&config).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocking_jobs_are_bounded() {
        let authenticator = Arc::new(test_authenticator());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let authenticator = Arc::clone(&authenticator);
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                authenticator
                    .run_blocking(move || {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(20));
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(authenticator.hash_permits.available_permits(), 2);
    }
}
