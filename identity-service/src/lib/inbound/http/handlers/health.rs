use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<UptimeStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatus {
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeStatus {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

/// Full health report: storage connectivity plus uptime. 503 when storage is
/// unreachable.
pub async fn health<R: UserRepository>(
    State(state): State<AppState<R>>,
) -> (StatusCode, Json<HealthReport>) {
    let database_up = state.users.ping().await.is_ok();

    let report = HealthReport {
        status: if database_up { "ok" } else { "error" },
        checks: HealthChecks {
            database: Some(CheckStatus {
                status: if database_up { "up" } else { "down" },
            }),
            uptime: Some(UptimeStatus {
                status: "up",
                uptime_seconds: state.uptime_seconds(),
            }),
        },
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}

/// Liveness probe: the process answers requests.
pub async fn liveness() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        checks: HealthChecks {
            database: None,
            uptime: None,
        },
    })
}

/// Readiness probe: storage must be reachable before traffic is admitted.
pub async fn readiness<R: UserRepository>(
    State(state): State<AppState<R>>,
) -> (StatusCode, Json<HealthReport>) {
    let database_up = state.users.ping().await.is_ok();

    let report = HealthReport {
        status: if database_up { "ok" } else { "error" },
        checks: HealthChecks {
            database: Some(CheckStatus {
                status: if database_up { "up" } else { "down" },
            }),
            uptime: None,
        },
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
