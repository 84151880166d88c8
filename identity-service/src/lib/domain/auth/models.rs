use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
use crate::domain::user::models::UserRole;

/// A freshly issued access/refresh token pair.
///
/// Transient: the pair is handed to the caller exactly once. Only the digest
/// of the refresh half is persisted (on the user), never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims carried by an access token.
///
/// Role and email ride along so request handling does not need a user lookup
/// for authorization decisions. They are snapshots: a role change only shows
/// up after the next refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a refresh token: the subject and nothing else.
///
/// Email and role are intentionally absent so that whatever a refresh token
/// grants is always resolved against current user state at refresh time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Command to register a new account.
#[derive(Debug)]
pub struct RegisterCommand {
    pub full_name: FullName,
    pub email: EmailAddress,
    pub password: Password,
    pub role: UserRole,
}

/// Command to authenticate with email and password.
///
/// Raw strings on purpose: a login attempt with a malformed email or a
/// password that predates the current policy must fail with the same generic
/// unauthorized error as a wrong password, not a validation error.
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
