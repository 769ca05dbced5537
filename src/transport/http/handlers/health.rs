use crate::infra::sheets::{BackendMode, SheetBackend};
use crate::transport::http::types::{AppState, HealthResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "API is up; `sheets_connected` reports the backing store", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let sheets_connected = match state.backend.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe: backing store unreachable");
            false
        }
    };
    let mode = state.backend.mode();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: "API running".to_string(),
            sheets_connected,
            dev_mode: mode == BackendMode::Development,
            mode: mode.as_str().to_string(),
            checked_at: Utc::now().to_rfc3339(),
        }),
    )
}
