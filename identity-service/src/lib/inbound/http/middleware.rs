use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::auth::ports::TokenSigner;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRole;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated caller, built from access-token
/// claims. Role and email are the claim snapshots, not a fresh lookup: role
/// changes apply from the next refresh onward.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
}

/// Extension type carrying a verified refresh presentation. Retains the raw
/// token so the service can compare it against the stored digest.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub user_id: UserId,
    pub refresh_token: String,
}

/// Middleware guarding routes with an access token.
///
/// Verifies signature and expiry against the access secret, then confirms
/// the account still exists and is not soft-deleted before admitting the
/// request.
pub async fn authenticate<R: UserRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    let claims = state.signer.verify_access(token).map_err(|e| {
        tracing::warn!("Access token rejected: {}", e);
        reject("Invalid or expired token")
    })?;

    let user_id = ensure_live_account(&state, &claims.sub).await?;

    req.extensions_mut().insert(CurrentUser {
        user_id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Middleware guarding the refresh endpoint with a refresh token.
///
/// This is the upstream half of rotation: signature and expiry are settled
/// here against the refresh secret, so the service only has to compare the
/// presented token with the stored digest.
pub async fn authenticate_refresh<R: UserRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?.to_string();

    let claims = state.signer.verify_refresh(&token).map_err(|e| {
        tracing::warn!("Refresh token rejected: {}", e);
        reject("Invalid or expired token")
    })?;

    let user_id = ensure_live_account(&state, &claims.sub).await?;

    req.extensions_mut().insert(RefreshSession {
        user_id,
        refresh_token: token,
    });

    Ok(next.run(req).await)
}

/// Authorization check for admin-only handlers.
pub fn require_admin(user: &CurrentUser) -> Result<(), ApiError> {
    if user.role == UserRole::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin role required".to_string()))
    }
}

/// Parse the subject claim and verify the account is present and not
/// soft-deleted. Failures are indistinguishable from a bad token.
async fn ensure_live_account<R: UserRepository>(
    state: &AppState<R>,
    sub: &str,
) -> Result<UserId, Response> {
    let user_id = UserId::from_string(sub).map_err(|e| {
        tracing::warn!("Token subject is not a user ID: {}", e);
        reject("Invalid token")
    })?;

    let user = state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    match user {
        Some(user) if !user.is_deleted() => Ok(user_id),
        _ => Err(reject("Invalid token")),
    }
}

fn reject(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| reject("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| reject("Invalid Authorization header"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(reject(
            "Invalid Authorization header format. Expected: Bearer <token>",
        ));
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
