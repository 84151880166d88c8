use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::ports::TokenSigner;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStatus;
use crate::domain::user::ports::UserRepository;

/// Credential and session service.
///
/// Owns registration, login, refresh-token rotation, and logout. Stateless:
/// session validity lives entirely in the user's stored refresh-token digest,
/// which is re-read from the repository on every call.
pub struct AuthService<R, H, S>
where
    R: UserRepository,
    H: PasswordHasher,
    S: TokenSigner,
{
    users: Arc<R>,
    hasher: Arc<H>,
    signer: Arc<S>,
}

impl<R, H, S> AuthService<R, H, S>
where
    R: UserRepository,
    H: PasswordHasher,
    S: TokenSigner,
{
    /// Create a new auth service with injected capabilities.
    pub fn new(users: Arc<R>, hasher: Arc<H>, signer: Arc<S>) -> Self {
        Self {
            users,
            hasher,
            signer,
        }
    }

    /// Issue a fresh token pair for the user and anchor its refresh half.
    ///
    /// The two signing calls are independent; if either fails the issuance
    /// aborts and nothing is persisted. The digest write must land before the
    /// pair is returned so that the returned refresh token is honored by the
    /// very next `refresh` call.
    ///
    /// Known race: two concurrent issuances for the same user both reach the
    /// digest write, and only the later pair stays valid. There is no
    /// compare-and-swap on the previous digest here.
    async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access_token = self.signer.sign_access(user)?;
        let refresh_token = self.signer.sign_refresh(user)?;

        let digest = self.hasher.hash(&refresh_token)?;
        self.users
            .set_refresh_token_hash(&user.id, Some(digest))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

#[async_trait]
impl<R, H, S> AuthServicePort for AuthService<R, H, S>
where
    R: UserRepository,
    H: PasswordHasher,
    S: TokenSigner,
{
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError> {
        // A soft-deleted holder does not block the address; the partial
        // unique index backstops the lookup-then-insert race.
        if let Some(existing) = self.users.find_by_email(command.email.as_str()).await? {
            if !existing.is_deleted() {
                return Err(AuthError::EmailTaken);
            }
        }

        let password_hash = self.hasher.hash(command.password.as_str())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            full_name: command.full_name,
            email: command.email,
            password_hash,
            role: command.role,
            status: UserStatus::Active,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.issue_token_pair(&user).await
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError> {
        let user = match self.users.find_by_email(&command.email).await? {
            Some(user) if !user.is_deleted() => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        if !self
            .hasher
            .verify(&command.password, &user.password_hash)?
        {
            return Err(AuthError::InvalidCredentials);
        }

        // Overwrites any previous digest: a second login ends the first
        // session's ability to refresh.
        self.issue_token_pair(&user).await
    }

    async fn refresh(
        &self,
        user_id: &UserId,
        presented_token: &str,
    ) -> Result<TokenPair, AuthError> {
        let user = match self.users.find_by_id(user_id).await? {
            Some(user) if !user.is_deleted() => user,
            _ => return Err(AuthError::SessionRevoked),
        };

        let stored_digest = user
            .refresh_token_hash
            .as_deref()
            .ok_or(AuthError::SessionRevoked)?;

        if !self.hasher.verify(presented_token, stored_digest)? {
            // Either a forged token or a replay of one already rotated away
            return Err(AuthError::SessionRevoked);
        }

        self.issue_token_pair(&user).await
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), AuthError> {
        match self.users.set_refresh_token_hash(user_id, None).await {
            Ok(_) => Ok(()),
            // The session is equally gone if the user no longer exists
            Err(UserError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
