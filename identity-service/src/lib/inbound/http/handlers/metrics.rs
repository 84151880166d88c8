use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::require_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Prometheus text exposition for scraping.
pub async fn metrics<R: UserRepository>(State(state): State<AppState<R>>) -> String {
    let mut out = String::new();

    out.push_str("# HELP identity_service_uptime_seconds Seconds since the service started\n");
    out.push_str("# TYPE identity_service_uptime_seconds counter\n");
    out.push_str(&format!(
        "identity_service_uptime_seconds {}\n",
        state.uptime_seconds()
    ));

    out.push_str("# HELP identity_service_build_info Build information\n");
    out.push_str("# TYPE identity_service_build_info gauge\n");
    out.push_str(&format!(
        "identity_service_build_info{{version=\"{}\"}} 1\n",
        env!("CARGO_PKG_VERSION")
    ));

    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub uptime_seconds: u64,
    pub pid: u32,
    pub version: &'static str,
    pub platform: &'static str,
    pub arch: &'static str,
    pub cpu_count: usize,
}

/// Detailed process snapshot for operators (admin only).
pub async fn system_metrics<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<SystemMetrics>, ApiError> {
    require_admin(&current_user)?;

    Ok(Json(SystemMetrics {
        uptime_seconds: state.uptime_seconds(),
        pid: std::process::id(),
        version: env!("CARGO_PKG_VERSION"),
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        cpu_count: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    }))
}
