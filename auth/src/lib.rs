//! Credential authentication library
//!
//! Provides the security-sensitive core behind signup and login:
//! - Password hashing (Argon2id, `base64(salt):base64(hash)` digests)
//! - Constant-time password verification
//! - Signed, expiring bearer tokens (HMAC JWS)
//! - An async facade that keeps key derivation off the request threads
//!
//! Routing, persistence, and response shaping belong to the callers. The
//! digest and the token are opaque strings to them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use authcore::{KdfParams, PasswordHasher};
//!
//! let params = KdfParams { memory_cost: 1024, time_cost: 1, parallelism: 1, output_length: 32 };
//! let hasher = PasswordHasher::new(params, 16).unwrap();
//! let digest = hasher.hash(b"my_password").unwrap();
//! assert!(hasher.verify(b"my_password", &digest).unwrap());
//! assert!(!hasher.verify(b"other_password", &digest).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use authcore::{ExpirySpec, TokenIssuer};
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue(7, false, &ExpirySpec::minutes(30)).unwrap();
//! assert_eq!(token.split('.').count(), 3);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use authcore::{Authenticator, ExpirySpec, KdfParams, PasswordHasher, TokenIssuer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let params = KdfParams { memory_cost: 1024, time_cost: 1, parallelism: 1, output_length: 32 };
//! let auth = Authenticator::new(
//!     PasswordHasher::new(params, 16).unwrap(),
//!     TokenIssuer::new(b"secret_key_at_least_32_bytes_long!"),
//!     4,
//!     ExpirySpec::minutes(30),
//! );
//!
//! // Register: hash password
//! let digest = auth.hash_password("password123").await.unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &digest, 7, false).await.unwrap();
//! println!("Token: {}", result.access_token);
//! # }
//! ```

pub mod account;
pub mod authenticator;
pub mod config;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use account::AccountError;
pub use account::AccountService;
pub use account::CredentialStore;
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use crate::config::AuthConfig;
pub use password::KdfParams;
pub use password::MalformedDigestError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::ExpirySpec;
pub use token::SigningError;
pub use token::TokenClaims;
pub use token::TokenError;
pub use token::TokenIssuer;
