use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::HashingError;
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::models::AccessClaims;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RefreshClaims;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::TokenPair;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for the credential and session lifecycle.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and open its first session.
    ///
    /// # Errors
    /// * `EmailTaken` - A non-deleted user already holds this email
    /// * `Hashing` / `Token` - Infrastructure failure during issuance
    /// * `User` - Storage failure
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError>;

    /// Authenticate with email and password and open a session, invalidating
    /// any prior one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, deleted account, or password
    ///   mismatch (indistinguishable by design)
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError>;

    /// Rotate the session: verify the presented refresh token against the
    /// stored digest, then issue a fresh pair. After success the presented
    /// token is permanently dead - replaying it fails.
    ///
    /// The caller must have already verified the token's signature and expiry
    /// against the refresh secret (the HTTP refresh guard does this).
    ///
    /// # Errors
    /// * `SessionRevoked` - No active session, digest mismatch, or
    ///   missing/deleted user (indistinguishable by design)
    async fn refresh(&self, user_id: &UserId, presented_token: &str)
        -> Result<TokenPair, AuthError>;

    /// Close the session by clearing the stored digest. Idempotent.
    ///
    /// # Errors
    /// * `User` - Storage failure
    async fn logout(&self, user_id: &UserId) -> Result<(), AuthError>;
}

/// One-way digest capability.
///
/// Injected rather than constructed in place so tests can substitute a mock
/// and deployments can tune cost parameters. Serves double duty: password
/// digests at rest and refresh-token digests on the session.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Digest a plaintext secret.
    ///
    /// # Errors
    /// * `HashingFailed` - The hashing primitive failed
    fn hash(&self, plain: &str) -> Result<String, HashingError>;

    /// Compare a plaintext secret against a stored digest. A mismatch is
    /// `Ok(false)`, not an error.
    ///
    /// # Errors
    /// * `VerificationFailed` - The stored digest is malformed
    fn verify(&self, plain: &str, digest: &str) -> Result<bool, HashingError>;
}

/// Token signing and verification capability.
///
/// Access and refresh tokens are independent: separate secrets, separate
/// lifetimes, separate claim sets.
pub trait TokenSigner: Send + Sync + 'static {
    /// Sign a short-lived access token carrying `{sub, email, role}`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    fn sign_access(&self, user: &User) -> Result<String, TokenError>;

    /// Sign a long-lived refresh token carrying only `{sub}`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    fn sign_refresh(&self, user: &User) -> Result<String, TokenError>;

    /// Verify an access token's signature and expiry.
    ///
    /// # Errors
    /// * `Expired` / `Invalid` - Token rejected
    fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError>;

    /// Verify a refresh token's signature and expiry.
    ///
    /// # Errors
    /// * `Expired` / `Invalid` - Token rejected
    fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError>;
}
