use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::ports::PasswordHasher;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user management.
pub struct UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    /// Create a new user service with injected dependencies.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    fn hash_password(&self, plain: &str) -> Result<String, UserError> {
        self.hasher
            .hash(plain)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))
    }
}

#[async_trait]
impl<R, H> UserServicePort for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if let Some(existing) = self.users.find_by_email(command.email.as_str()).await? {
            if !existing.is_deleted() {
                return Err(UserError::EmailTaken);
            }
        }

        let password_hash = self.hash_password(command.password.as_str())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            full_name: command.full_name,
            email: command.email,
            password_hash,
            role: command.role,
            status: command.status,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let created = self.users.create(user).await?;
        tracing::info!(user_id = %created.id, "User created");

        Ok(created)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, query: &ListUsersQuery) -> Result<UserPage, UserError> {
        self.users.list(query).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(full_name) = command.full_name {
            user.full_name = full_name;
        }

        if let Some(email) = command.email {
            user.email = email;
        }

        if let Some(password) = command.password {
            user.password_hash = self.hash_password(password.as_str())?;
        }

        if let Some(role) = command.role {
            user.role = role;
        }

        if let Some(status) = command.status {
            user.status = status;
        }

        user.updated_at = Utc::now();

        let updated = self.users.update(user).await?;
        tracing::info!(user_id = %updated.id, "User updated");

        Ok(updated)
    }

    async fn soft_delete_user(&self, id: &UserId) -> Result<User, UserError> {
        let deleted = self.users.soft_delete(id, Utc::now()).await?;
        tracing::info!(user_id = %deleted.id, "User soft-deleted");

        Ok(deleted)
    }
}
