use argon2::Params;
use serde::Deserialize;

use super::errors::PasswordError;

/// Argon2id cost parameters.
///
/// Hashing and verification must run with identical values: a digest produced
/// under one set of parameters never verifies under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_cost: u32,

    /// Number of passes over memory
    pub time_cost: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,

    /// Derived key length in bytes
    pub output_length: usize,
}

impl KdfParams {
    pub const DEFAULT_MEMORY_COST: u32 = 64 * 1024;
    pub const DEFAULT_TIME_COST: u32 = 3;
    pub const DEFAULT_PARALLELISM: u32 = 4;
    pub const DEFAULT_OUTPUT_LENGTH: usize = 32;

    /// Convert into validated Argon2 parameters.
    ///
    /// # Errors
    /// * `InvalidParams` - A cost is outside the range Argon2 accepts
    pub fn to_argon2(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_length),
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: Self::DEFAULT_MEMORY_COST,
            time_cost: Self::DEFAULT_TIME_COST,
            parallelism: Self::DEFAULT_PARALLELISM,
            output_length: Self::DEFAULT_OUTPUT_LENGTH,
        }
    }
}
