use std::str::FromStr;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::UserStatus;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::FieldErrors;
use crate::inbound::http::middleware::require_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a user (raw JSON). All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
    status: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        let full_name = self.full_name.map(FullName::new).transpose();
        let email = self.email.map(EmailAddress::new).transpose();
        let password = self.password.map(Password::new).transpose();
        let role = self
            .role
            .map(|role| UserRole::from_str(&role))
            .transpose();
        let status = self
            .status
            .map(|status| UserStatus::from_str(&status))
            .transpose();

        let mut errors = FieldErrors::default();
        errors.capture("fullName", &full_name);
        errors.capture("email", &email);
        errors.capture("password", &password);
        errors.capture("role", &role);
        errors.capture("status", &status);

        match (full_name, email, password, role, status) {
            (Ok(full_name), Ok(email), Ok(password), Ok(role), Ok(status)) => {
                Ok(UpdateUserCommand {
                    full_name,
                    email,
                    password,
                    role,
                    status,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    require_admin(&current_user)?;

    let user_id = UserId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let command = body.try_into_command()?;

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
