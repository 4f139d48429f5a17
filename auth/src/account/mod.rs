pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::AccountError;
pub use models::Account;
pub use models::LogInCommand;
pub use models::LoginOutcome;
pub use models::NewAccount;
pub use models::SignUpCommand;
pub use models::StoredCredential;
pub use ports::CredentialStore;
pub use service::AccountService;
