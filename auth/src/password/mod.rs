pub mod errors;
pub mod hasher;
pub mod params;

pub use errors::DigestSegment;
pub use errors::MalformedDigestError;
pub use errors::PasswordError;
pub use hasher::PasswordHasher;
pub use params::KdfParams;
