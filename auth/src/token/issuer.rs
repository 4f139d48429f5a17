use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::TokenClaims;
use super::errors::SigningError;
use super::errors::TokenError;
use super::expiry::ExpirySpec;

/// Bearer token issuer.
///
/// Signs [`TokenClaims`] with a symmetric key. Uses HS256 (HMAC with
/// SHA-256) unless another HMAC algorithm is selected. Issuance is stateless:
/// nothing about an issued token is retained.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    empty_key: bool,
}

impl TokenIssuer {
    /// Create a new token issuer with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - An empty secret is accepted here but every `issue` call fails
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            empty_key: secret.is_empty(),
        }
    }

    /// Select the signing algorithm. Only HS256, HS384 and HS512 can sign.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Issue a signed token for a subject.
    ///
    /// # Arguments
    /// * `subject_id` - Account identifier placed in the `uid` claim
    /// * `privileged` - Admin flag placed in the `admin` claim
    /// * `expiry` - Lifetime; the first non-zero field wins
    ///
    /// # Returns
    /// Compact JWS token string
    ///
    /// # Errors
    /// * `InvalidExpiry` - No expiry field set, or the expiry overflows
    /// * `Signing` - Key is empty, algorithm is not HMAC, or encoding failed
    pub fn issue(
        &self,
        subject_id: u64,
        privileged: bool,
        expiry: &ExpirySpec,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::new(subject_id, privileged, expiry, Utc::now())?;
        let token = self.sign(&claims)?;

        tracing::debug!(
            subject_id = claims.subject_id,
            privileged = claims.privileged,
            expires_at = claims.expires_at,
            "Token issued"
        );

        Ok(token)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, SigningError> {
        if self.empty_key {
            return Err(SigningError::EmptyKey);
        }

        if !is_hmac(self.algorithm) {
            return Err(SigningError::UnsupportedAlgorithm(format!(
                "{:?}",
                self.algorithm
            )));
        }

        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| SigningError::Rejected(e.to_string()))
    }
}

pub(crate) fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::decode;
    use jsonwebtoken::DecodingKey;
    use jsonwebtoken::Validation;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn decode_claims(token: &str, secret: &[u8], algorithm: Algorithm) -> TokenClaims {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret),
            &Validation::new(algorithm),
        )
        .expect("Failed to decode token")
        .claims
    }

    #[test]
    fn test_issue_and_decode() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue(7, false, &ExpirySpec::minutes(30))
            .expect("Failed to issue token");
        let claims = decode_claims(&token, SECRET, Algorithm::HS256);

        assert_eq!(claims.subject_id, 7);
        assert!(!claims.privileged);
        let expected = Utc::now().timestamp() + 1800;
        assert!((claims.expires_at - expected).abs() <= 1);
    }

    #[test]
    fn test_largest_unit_wins() {
        let issuer = TokenIssuer::new(SECRET);
        let expiry = ExpirySpec {
            years: 1,
            minutes: 30,
            ..ExpirySpec::default()
        };

        let token = issuer.issue(1, true, &expiry).expect("Failed to issue token");
        let claims = decode_claims(&token, SECRET, Algorithm::HS256);

        assert!(claims.privileged);
        let expected = Utc::now().timestamp() + 365 * 24 * 60 * 60;
        assert!((claims.expires_at - expected).abs() <= 1);
    }

    #[test]
    fn test_empty_key_fails() {
        let issuer = TokenIssuer::new(b"");

        let result = issuer.issue(7, false, &ExpirySpec::minutes(30));
        assert!(matches!(
            result,
            Err(TokenError::Signing(SigningError::EmptyKey))
        ));
    }

    #[test]
    fn test_zero_expiry_fails() {
        let issuer = TokenIssuer::new(SECRET);

        let result = issuer.issue(7, false, &ExpirySpec::default());
        assert!(matches!(result, Err(TokenError::InvalidExpiry(_))));
    }

    #[test]
    fn test_non_hmac_algorithm_fails() {
        let issuer = TokenIssuer::new(SECRET).with_algorithm(Algorithm::RS256);

        let result = issuer.issue(7, false, &ExpirySpec::minutes(5));
        assert!(matches!(
            result,
            Err(TokenError::Signing(SigningError::UnsupportedAlgorithm(_)))
        ));
    }

    #[test]
    fn test_hs512() {
        let issuer = TokenIssuer::new(SECRET).with_algorithm(Algorithm::HS512);

        let token = issuer.issue(3, false, &ExpirySpec::hours(1)).unwrap();
        let claims = decode_claims(&token, SECRET, Algorithm::HS512);

        assert_eq!(claims.subject_id, 3);
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let issuer = TokenIssuer::new(b"secret1_at_least_32_bytes_long_key!");
        let token = issuer.issue(7, false, &ExpirySpec::minutes(30)).unwrap();

        let result = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"secret2_at_least_32_bytes_long_key!"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
