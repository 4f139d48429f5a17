use std::hint::black_box;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use super::errors::DigestSegment;
use super::errors::MalformedDigestError;
use super::errors::PasswordError;
use super::params::KdfParams;

const SEPARATOR: char = ':';
const MIN_SALT_LENGTH: usize = 8;

/// Password hashing implementation.
///
/// Produces `base64(salt):base64(hash)` digests using Argon2id with a fixed
/// parameter set bound at construction. Holds no mutable state; share it
/// freely across threads.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    salt_length: usize,
    output_length: usize,
}

impl PasswordHasher {
    /// Create a new password hasher.
    ///
    /// # Arguments
    /// * `params` - Argon2id cost parameters
    /// * `salt_length` - Bytes of fresh salt generated per hash
    ///
    /// # Errors
    /// * `InvalidParams` - Parameters or salt length outside Argon2 limits
    pub fn new(params: KdfParams, salt_length: usize) -> Result<Self, PasswordError> {
        if salt_length < MIN_SALT_LENGTH {
            return Err(PasswordError::InvalidParams(format!(
                "salt length must be at least {} bytes, got {}",
                MIN_SALT_LENGTH, salt_length
            )));
        }

        Ok(Self {
            params: params.to_argon2()?,
            salt_length,
            output_length: params.output_length,
        })
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// Digest string `base64(salt):base64(hash)` without padding
    ///
    /// # Errors
    /// * `RandomSource` - The OS random source could not provide a salt
    /// * `KeyDerivation` - Argon2 rejected the input
    pub fn hash(&self, password: &[u8]) -> Result<String, PasswordError> {
        let salt = self.generate_salt()?;
        let hash = self
            .derive(password, &salt)
            .map_err(|e| PasswordError::KeyDerivation(e.to_string()))?;

        Ok(format!(
            "{}{}{}",
            STANDARD_NO_PAD.encode(&salt),
            SEPARATOR,
            STANDARD_NO_PAD.encode(&hash)
        ))
    }

    /// Verify a password against a stored digest.
    ///
    /// # Returns
    /// True only if the recomputed hash matches byte for byte
    ///
    /// # Errors
    /// * `MalformedDigest` - Digest is not two unpadded base64 segments, or
    ///   its salt is too short to have come from this hasher
    /// * `KeyDerivation` - Argon2 rejected the input
    pub fn verify(&self, password: &[u8], digest: &str) -> Result<bool, PasswordError> {
        let (salt, expected) = decode_digest(digest)?;

        let actual = self
            .derive(password, &salt)
            .map_err(|e| PasswordError::KeyDerivation(e.to_string()))?;

        Ok(constant_time_eq(&actual, &expected))
    }

    /// A well-formed digest in this hasher's shape that no password is
    /// expected to match.
    ///
    /// Verifying against it costs one full key derivation, the same as a
    /// stored digest with the wrong password.
    pub fn decoy_digest(&self) -> String {
        format!(
            "{}{}{}",
            STANDARD_NO_PAD.encode(vec![0u8; self.salt_length]),
            SEPARATOR,
            STANDARD_NO_PAD.encode(vec![0u8; self.output_length])
        )
    }

    fn generate_salt(&self) -> Result<Vec<u8>, PasswordError> {
        let mut salt = vec![0u8; self.salt_length];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::RandomSource(e.to_string()))?;
        Ok(salt)
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>, argon2::Error> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let mut output = vec![0u8; self.output_length];
        argon2.hash_password_into(password, salt, &mut output)?;
        Ok(output)
    }
}

fn decode_digest(digest: &str) -> Result<(Vec<u8>, Vec<u8>), MalformedDigestError> {
    let segments: Vec<&str> = digest.split(SEPARATOR).collect();
    let [salt, hash] = segments.as_slice() else {
        return Err(MalformedDigestError::SegmentCount(segments.len()));
    };

    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|source| MalformedDigestError::Encoding {
            segment: DigestSegment::Salt,
            source,
        })?;
    let hash = STANDARD_NO_PAD
        .decode(hash)
        .map_err(|source| MalformedDigestError::Encoding {
            segment: DigestSegment::Hash,
            source,
        })?;

    if salt.len() < MIN_SALT_LENGTH {
        return Err(MalformedDigestError::SaltTooShort {
            min: MIN_SALT_LENGTH,
            actual: salt.len(),
        });
    }

    Ok((salt, hash))
}

/// Compare two byte strings without an early exit on the first difference.
///
/// Only the lengths are allowed to short-circuit; they are fixed by
/// configuration and carry nothing secret.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= black_box(x ^ y);
    }

    black_box(diff) == 0
}
