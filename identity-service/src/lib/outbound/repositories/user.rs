use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::ports::UserRepository;

const USER_COLUMNS: &str = "id, full_name, email, password_hash, role, status, \
     refresh_token_hash, created_at, updated_at, deleted_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; converted into the domain aggregate via `TryFrom`.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    refresh_token_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            full_name: FullName::new(row.full_name)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            status: row.status.parse()?,
            refresh_token_hash: row.refresh_token_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Append the shared WHERE clause for listing filters to a builder, so the
/// page query and the count query cannot drift apart.
fn push_filters<'args>(builder: &mut QueryBuilder<'args, Postgres>, query: &ListUsersQuery) {
    builder.push(" WHERE TRUE");

    if !query.include_deleted {
        builder.push(" AND deleted_at IS NULL");
    }

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(role) = query.role {
        builder.push(" AND role = ").push_bind(role.as_str());
    }

    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return UserError::EmailAlreadyExists(email.to_string());
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            "INSERT INTO users (id, full_name, email, password_hash, role, status, \
             refresh_token_hash, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user.id.0)
        .bind(user.full_name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.refresh_token_hash.as_deref())
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user.email.as_str()))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        // A live account sorts ahead of soft-deleted namesakes
        let sql = format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1) \
             ORDER BY deleted_at ASC NULLS FIRST LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self, query: &ListUsersQuery) -> Result<UserPage, UserError> {
        let mut rows_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");

        push_filters(&mut rows_query, query);
        push_filters(&mut count_query, query);

        // Sort column comes from the SortField whitelist, never from raw input
        rows_query.push(format!(
            " ORDER BY {} {}",
            query.sort_by.column(),
            query.sort_order.sql()
        ));

        let offset = i64::from(query.page_number.saturating_sub(1)) * i64::from(query.page_size);
        rows_query.push(" LIMIT ").push_bind(i64::from(query.page_size));
        rows_query.push(" OFFSET ").push_bind(offset);

        let rows: Vec<UserRow> = rows_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserPage::new(
            items,
            total_count as u64,
            query.page_number,
            query.page_size,
        ))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            "UPDATE users SET full_name = $2, email = $3, password_hash = $4, \
             role = $5, status = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(user.id.0)
        .bind(user.full_name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user.email.as_str()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn set_refresh_token_hash(
        &self,
        id: &UserId,
        digest: Option<String>,
    ) -> Result<User, UserError> {
        // Last write wins; there is no guard against a concurrent rotation
        // overwriting this digest
        let sql = format!(
            "UPDATE users SET refresh_token_hash = $2, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .bind(digest.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.ok_or(UserError::NotFound(id.to_string()))?.try_into()
    }

    async fn soft_delete(
        &self,
        id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<User, UserError> {
        let sql = format!(
            "UPDATE users SET deleted_at = $2, updated_at = $2 \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .bind(deleted_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.ok_or(UserError::NotFound(id.to_string()))?.try_into()
    }

    async fn ping(&self) -> Result<(), UserError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }
}
