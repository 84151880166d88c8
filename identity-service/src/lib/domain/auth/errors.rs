use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Error for digest operations behind the `PasswordHasher` port.
#[derive(Debug, Clone, Error)]
pub enum HashingError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

/// Error for signing/verification behind the `TokenSigner` port.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

/// Top-level error for authentication operations.
///
/// Login and refresh failures intentionally collapse to two generic variants
/// (`InvalidCredentials`, `SessionRevoked`) whose messages do not reveal
/// which underlying check failed, to resist account enumeration.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// A non-deleted user already holds this email.
    #[error("User with this email already exists")]
    EmailTaken,

    /// Unknown email, soft-deleted account, or password mismatch on login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No active session, digest mismatch (including replay of a rotated
    /// refresh token), or missing/deleted user on refresh.
    #[error("Access denied")]
    SessionRevoked,

    #[error("Hashing error: {0}")]
    Hashing(#[from] HashingError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    User(#[from] UserError),
}
