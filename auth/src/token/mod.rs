pub mod claims;
pub mod errors;
pub mod expiry;
pub mod issuer;

pub use claims::TokenClaims;
pub use errors::ExpiryError;
pub use errors::SigningError;
pub use errors::TokenError;
pub use expiry::ExpirySpec;
pub use issuer::TokenIssuer;
