use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::TokenPairData;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
use crate::domain::user::models::UserRole;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::FieldErrors;
use crate::inbound::http::router::AppState;

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    full_name: String,
    email: String,
    password: String,
    role: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let full_name = FullName::new(self.full_name);
        let email = EmailAddress::new(self.email);
        let password = Password::new(self.password);
        let role = match self.role {
            Some(role) => UserRole::from_str(&role).map(Some),
            None => Ok(None),
        };

        let mut errors = FieldErrors::default();
        errors.capture("fullName", &full_name);
        errors.capture("email", &email);
        errors.capture("password", &password);
        errors.capture("role", &role);

        match (full_name, email, password, role) {
            (Ok(full_name), Ok(email), Ok(password), Ok(role)) => Ok(RegisterCommand {
                full_name,
                email,
                password,
                role: role.unwrap_or_default(),
            }),
            _ => Err(errors.into()),
        }
    }
}

pub async fn register<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::CREATED, pair.into()))
}
