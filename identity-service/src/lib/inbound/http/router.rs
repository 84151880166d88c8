use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth;
use super::handlers::health;
use super::handlers::metrics;
use super::handlers::users;
use super::middleware::authenticate;
use super::middleware::authenticate_refresh;
use crate::domain::auth::service::AuthService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::security::JwtTokenSigner;

/// Application state shared across handlers and guards.
///
/// Generic over the repository so integration tests can run the full router
/// against an in-memory store; hashing and signing are always real.
pub struct AppState<R: UserRepository> {
    pub auth_service: Arc<AuthService<R, Argon2PasswordHasher, JwtTokenSigner>>,
    pub user_service: Arc<UserService<R, Argon2PasswordHasher>>,
    pub users: Arc<R>,
    pub signer: Arc<JwtTokenSigner>,
    pub started_at: Instant,
}

impl<R: UserRepository> AppState<R> {
    /// Wire the services around a repository and the security adapters.
    pub fn new(
        users: Arc<R>,
        hasher: Arc<Argon2PasswordHasher>,
        signer: Arc<JwtTokenSigner>,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&users),
                Arc::clone(&hasher),
                Arc::clone(&signer),
            )),
            user_service: Arc::new(UserService::new(Arc::clone(&users), hasher)),
            users,
            signer,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            user_service: Arc::clone(&self.user_service),
            users: Arc::clone(&self.users),
            signer: Arc::clone(&self.signer),
            started_at: self.started_at,
        }
    }
}

pub fn create_router<R: UserRepository>(state: AppState<R>) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register::register::<R>))
        .route("/auth/login", post(auth::login::login::<R>))
        .route("/health", get(health::health::<R>))
        .route("/health/liveness", get(health::liveness))
        .route("/health/readiness", get(health::readiness::<R>))
        .route("/metrics", get(metrics::metrics::<R>));

    // The refresh guard verifies against the refresh secret; everything else
    // protected verifies against the access secret.
    let refresh_routes = Router::new()
        .route("/auth/refresh", post(auth::refresh::refresh::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_refresh::<R>,
        ));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout::logout::<R>))
        .route(
            "/users",
            post(users::create_user::create_user::<R>).get(users::list_users::list_users::<R>),
        )
        .route("/users/profile/me", get(users::get_profile::get_profile::<R>))
        .route(
            "/users/:id",
            get(users::get_user::get_user::<R>)
                .put(users::update_user::update_user::<R>)
                .delete(users::delete_user::delete_user::<R>),
        )
        .route("/metrics/system", get(metrics::system_metrics::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<R>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(refresh_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
