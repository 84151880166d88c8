use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use identity_service::config::JwtConfig;
use identity_service::domain::user::errors::UserError;
use identity_service::domain::user::models::ListUsersQuery;
use identity_service::domain::user::models::SortField;
use identity_service::domain::user::models::SortOrder;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::models::UserPage;
use identity_service::domain::user::ports::UserRepository;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::AppState;
use identity_service::outbound::security::Argon2PasswordHasher;
use identity_service::outbound::security::JwtTokenSigner;
use serde_json::json;
use uuid::Uuid;

pub const TEST_ACCESS_SECRET: &str = "test-access-secret-for-jwt-32-bytes-min!";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret-for-jwt-32-bytes-min!";

/// In-memory `UserRepository` with the same observable behavior as the
/// Postgres adapter, so the integration suite exercises the real router,
/// services, hashing, and signing without a database.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        let duplicate = users
            .values()
            .any(|u| u.email.as_str() == user.email.as_str() && !u.is_deleted());
        if duplicate {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        let needle = email.to_lowercase();

        let mut matches: Vec<&User> = users
            .values()
            .filter(|u| u.email.as_str() == needle)
            .collect();
        // Live account ahead of soft-deleted namesakes
        matches.sort_by_key(|u| u.is_deleted());

        Ok(matches.first().map(|u| (*u).clone()))
    }

    async fn list(&self, query: &ListUsersQuery) -> Result<UserPage, UserError> {
        let users = self.users.lock().unwrap();

        let mut items: Vec<User> = users
            .values()
            .filter(|u| query.include_deleted || !u.is_deleted())
            .filter(|u| {
                query.search.as_ref().map_or(true, |search| {
                    let needle = search.to_lowercase();
                    u.full_name.as_str().to_lowercase().contains(&needle)
                        || u.email.as_str().contains(&needle)
                })
            })
            .filter(|u| query.role.map_or(true, |role| u.role == role))
            .filter(|u| query.status.map_or(true, |status| u.status == status))
            .cloned()
            .collect();

        items.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::Id => a.id.0.cmp(&b.id.0),
                SortField::FullName => a.full_name.as_str().cmp(b.full_name.as_str()),
                SortField::Email => a.email.as_str().cmp(b.email.as_str()),
                SortField::Role => a.role.as_str().cmp(b.role.as_str()),
                SortField::Status => a.status.as_str().cmp(b.status.as_str()),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_count = items.len() as u64;
        let offset = (query.page_number.saturating_sub(1) * query.page_size) as usize;
        let page_items: Vec<User> = items
            .into_iter()
            .skip(offset)
            .take(query.page_size as usize)
            .collect();

        Ok(UserPage::new(
            page_items,
            total_count,
            query.page_number,
            query.page_size,
        ))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        let duplicate = users.values().any(|u| {
            u.id != user.id && u.email.as_str() == user.email.as_str() && !u.is_deleted()
        });
        if duplicate {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        if !users.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn set_refresh_token_hash(
        &self,
        id: &UserId,
        digest: Option<String>,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        let user = users
            .get_mut(&id.0)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.refresh_token_hash = digest;
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn soft_delete(
        &self,
        id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        let user = users
            .get_mut(&id.0)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.deleted_at = Some(deleted_at);
        user.updated_at = deleted_at;

        Ok(user.clone())
    }

    async fn ping(&self) -> Result<(), UserError> {
        Ok(())
    }
}

/// Test application that spawns the real axum server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let signer = Arc::new(JwtTokenSigner::new(&JwtConfig {
            access_secret: TEST_ACCESS_SECRET.to_string(),
            refresh_secret: TEST_REFRESH_SECRET.to_string(),
            access_expiration_minutes: 15,
            refresh_expiration_days: 7,
        }));

        let state = AppState::new(Arc::clone(&users), hasher, signer);
        let router = create_router(state);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and return its (access, refresh) token pair.
    pub async fn register_ok(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> (String, String) {
        let mut body = json!({
            "fullName": full_name,
            "email": email,
            "password": password,
        });
        if let Some(role) = role {
            body["role"] = json!(role);
        }

        let response = self
            .post("/auth/register")
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        token_pair(&body)
    }

    /// Log in and return the (access, refresh) token pair.
    pub async fn login_ok(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        token_pair(&body)
    }
}

/// Extract (access, refresh) from a token-pair response envelope.
pub fn token_pair(body: &serde_json::Value) -> (String, String) {
    (
        body["data"]["accessToken"]
            .as_str()
            .expect("missing accessToken")
            .to_string(),
        body["data"]["refreshToken"]
            .as_str()
            .expect("missing refreshToken")
            .to_string(),
    )
}
