use std::str::FromStr;

use axum::extract::Query;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::UserData;
use crate::domain::user::errors::ListQueryError;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::SortField;
use crate::domain::user::models::SortOrder;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::UserStatus;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::FieldErrors;
use crate::inbound::http::middleware::require_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Raw query parameters for the user listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListUsersParams {
    page_number: Option<u32>,
    page_size: Option<u32>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    search: Option<String>,
    role: Option<String>,
    status: Option<String>,
    include_deleted: Option<bool>,
}

impl ListUsersParams {
    fn try_into_query(self) -> Result<ListUsersQuery, ApiError> {
        let page_number = match self.page_number {
            Some(0) => Err(ListQueryError::InvalidPageNumber),
            Some(n) => Ok(n),
            None => Ok(1),
        };
        let page_size = match self.page_size {
            Some(0) => Err(ListQueryError::InvalidPageSize),
            Some(n) => Ok(n),
            None => Ok(10),
        };
        let sort_by = match self.sort_by {
            Some(field) => SortField::from_str(&field),
            None => Ok(SortField::default()),
        };
        let sort_order = match self.sort_order {
            Some(order) => SortOrder::from_str(&order),
            None => Ok(SortOrder::default()),
        };
        let role = match self.role {
            Some(role) => UserRole::from_str(&role).map(Some),
            None => Ok(None),
        };
        let status = match self.status {
            Some(status) => UserStatus::from_str(&status).map(Some),
            None => Ok(None),
        };

        let mut errors = FieldErrors::default();
        errors.capture("pageNumber", &page_number);
        errors.capture("pageSize", &page_size);
        errors.capture("sortBy", &sort_by);
        errors.capture("sortOrder", &sort_order);
        errors.capture("role", &role);
        errors.capture("status", &status);

        match (page_number, page_size, sort_by, sort_order, role, status) {
            (Ok(page_number), Ok(page_size), Ok(sort_by), Ok(sort_order), Ok(role), Ok(status)) => {
                Ok(ListUsersQuery {
                    page_number,
                    page_size,
                    sort_by,
                    sort_order,
                    search: self.search,
                    role,
                    status,
                    include_deleted: self.include_deleted.unwrap_or(false),
                })
            }
            _ => Err(errors.into()),
        }
    }
}

/// Paginated listing body, returned flat rather than nested under `data` of
/// the generic envelope: page metadata lives next to the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPageBody {
    pub is_success: bool,
    pub data: Vec<UserData>,
    pub total_count: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl From<UserPage> for UserPageBody {
    fn from(page: UserPage) -> Self {
        Self {
            is_success: true,
            data: page.items.iter().map(UserData::from).collect(),
            total_count: page.total_count,
            current_page: page.page_number,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<UserPageBody>, ApiError> {
    require_admin(&current_user)?;

    let query = params.try_into_query()?;

    state
        .user_service
        .list_users(&query)
        .await
        .map_err(ApiError::from)
        .map(|page| Json(page.into()))
}
