use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

use crate::password::KdfParams;
use crate::password::PasswordHasher;
use crate::token::issuer::is_hmac;
use crate::token::ExpirySpec;

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub password: PasswordConfig,
    pub token: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub salt_length: usize,
    pub kdf: KdfParams,
    pub max_concurrent_hashes: usize,
}

#[derive(Deserialize, Clone)]
pub struct TokenConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_session_ttl")]
    pub session_ttl: ExpirySpec,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

fn default_algorithm() -> Algorithm {
    Algorithm::HS256
}

fn default_session_ttl() -> ExpirySpec {
    ExpirySpec::minutes(30)
}

impl AuthConfig {
    pub const DEFAULT_SALT_LENGTH: usize = 16;
    pub const DEFAULT_MAX_CONCURRENT_HASHES: usize = 4;

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__TOKEN__SECRET, AUTH__PASSWORD__SALT_LENGTH, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (everything except the token secret)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_from(&run_mode, Self::environment())
    }

    /// Environment source for `AUTH__SECTION__KEY` variables.
    ///
    /// Values stay strings; typed fields are parsed during deserialization,
    /// so a secret such as `007` is kept verbatim.
    fn environment() -> Environment {
        Environment::with_prefix("AUTH").separator("__")
    }

    fn load_from(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .set_default("password.salt_length", Self::DEFAULT_SALT_LENGTH as i64)?
            .set_default(
                "password.max_concurrent_hashes",
                Self::DEFAULT_MAX_CONCURRENT_HASHES as i64,
            )?
            .set_default(
                "password.kdf.memory_cost",
                i64::from(KdfParams::DEFAULT_MEMORY_COST),
            )?
            .set_default(
                "password.kdf.time_cost",
                i64::from(KdfParams::DEFAULT_TIME_COST),
            )?
            .set_default(
                "password.kdf.parallelism",
                i64::from(KdfParams::DEFAULT_PARALLELISM),
            )?
            .set_default(
                "password.kdf.output_length",
                KdfParams::DEFAULT_OUTPUT_LENGTH as i64,
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__TOKEN__SECRET=... overrides token.secret
            .add_source(environment)
            .build()?;

        let config: AuthConfig = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check the values a running deployment cannot recover from.
    ///
    /// Meant for process start; a failure here should stop the service
    /// before it accepts requests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_password_hasher().map(|_| ())
    }

    /// Run every [`validate`](Self::validate) check, returning the hasher
    /// built for the salt and KDF checks.
    pub(crate) fn validated_password_hasher(&self) -> Result<PasswordHasher, ConfigError> {
        let password_hasher = PasswordHasher::new(self.password.kdf, self.password.salt_length)
            .map_err(|e| ConfigError::Message(format!("password: {}", e)))?;

        if self.password.max_concurrent_hashes == 0 {
            return Err(ConfigError::Message(
                "password: max_concurrent_hashes must be at least 1".to_string(),
            ));
        }

        if self.token.secret.is_empty() {
            return Err(ConfigError::Message(
                "token: secret must not be empty".to_string(),
            ));
        }

        if !is_hmac(self.token.algorithm) {
            return Err(ConfigError::Message(format!(
                "token: algorithm {:?} is not an HMAC algorithm",
                self.token.algorithm
            )));
        }

        self.token
            .session_ttl
            .resolve()
            .map_err(|e| ConfigError::Message(format!("token: session_ttl: {}", e)))?;

        Ok(password_hasher)
    }
}
