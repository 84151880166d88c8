use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;

/// Port for user management operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create a new user with a hashed password.
    ///
    /// # Errors
    /// * `EmailTaken` - A non-deleted user already holds this email
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve a user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve a filtered, paginated user listing.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self, query: &ListUsersQuery) -> Result<UserPage, UserError>;

    /// Update an existing user with optional fields. A new password is
    /// re-hashed before it is stored.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Soft-delete a user by stamping `deleted_at`. The row is retained; the
    /// account becomes unusable for login and refresh.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn soft_delete_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
///
/// This is the single source of truth for session validity: the stored
/// `refresh_token_hash` is re-read on every refresh and logout, with no
/// in-memory session cache in front of it.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - The active-email unique constraint fired
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve a user by identifier. Soft-deleted users are returned;
    /// callers decide whether deletion matters.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a user by email, case-insensitively. When a deleted and a
    /// live account share an address, the live one wins.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve a filtered, paginated listing.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, query: &ListUsersQuery) -> Result<UserPage, UserError>;

    /// Update an existing user's profile fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Overwrite the stored refresh-token digest. `None` clears the session.
    ///
    /// This is a plain last-write-wins update: there is deliberately no
    /// compare-and-swap against the previous digest, so two concurrent
    /// refreshes for the same user can both succeed with only the later
    /// digest surviving.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_refresh_token_hash(
        &self,
        id: &UserId,
        digest: Option<String>,
    ) -> Result<User, UserError>;

    /// Stamp `deleted_at` on a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn soft_delete(&self, id: &UserId, deleted_at: DateTime<Utc>)
        -> Result<User, UserError>;

    /// Probe storage connectivity for health reporting.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage is unreachable
    async fn ping(&self) -> Result<(), UserError>;
}
