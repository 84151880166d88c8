use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::UserData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
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

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    full_name: String,
    email: String,
    password: String,
    role: Option<String>,
    status: Option<String>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ApiError> {
        let full_name = FullName::new(self.full_name);
        let email = EmailAddress::new(self.email);
        let password = Password::new(self.password);
        let role = match self.role {
            Some(role) => UserRole::from_str(&role).map(Some),
            None => Ok(None),
        };
        let status = match self.status {
            Some(status) => UserStatus::from_str(&status).map(Some),
            None => Ok(None),
        };

        let mut errors = FieldErrors::default();
        errors.capture("fullName", &full_name);
        errors.capture("email", &email);
        errors.capture("password", &password);
        errors.capture("role", &role);
        errors.capture("status", &status);

        match (full_name, email, password, role, status) {
            (Ok(full_name), Ok(email), Ok(password), Ok(role), Ok(status)) => {
                Ok(CreateUserCommand {
                    full_name,
                    email,
                    password,
                    role: role.unwrap_or_default(),
                    status: status.unwrap_or_default(),
                })
            }
            _ => Err(errors.into()),
        }
    }
}

pub async fn create_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    require_admin(&current_user)?;

    let command = body.try_into_command()?;

    state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}
