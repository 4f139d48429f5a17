use chrono::DateTime;
use chrono::Utc;

/// Account as exposed to callers. Never carries the credential digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub last_login: Option<DateTime<Utc>>,
}

/// Account row as the credential store holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub account: Account,
    pub password_digest: String,
    pub privileged: bool,
}

/// Account to be persisted; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignUpCommand {
    pub fn new(username: String, email: String, password: String) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

/// Login attempt. `login` matches either the username or the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInCommand {
    pub login: String,
    pub password: String,
}

impl LogInCommand {
    pub fn new(login: String, password: String) -> Self {
        Self { login, password }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub account: Account,
    pub access_token: String,
}
