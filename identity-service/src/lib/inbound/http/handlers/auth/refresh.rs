use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::TokenPairData;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::RefreshSession;
use crate::inbound::http::router::AppState;

/// Rotate the caller's session.
///
/// The refresh guard has already verified the token's signature and expiry;
/// the service compares it with the stored digest and rotates on match.
pub async fn refresh<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(session): Extension<RefreshSession>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    state
        .auth_service
        .refresh(&session.user_id, &session.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
}
