use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// End the caller's session. The still-valid access token keeps working
/// until natural expiry; only the refresh path dies here.
pub async fn logout<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .logout(&current_user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
