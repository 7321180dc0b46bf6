//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};

use clinica_backend::ApiResponse;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns ok if the server is running. Does not check dependencies.
pub async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::ok("ok"))
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the backend is not reachable.
pub async fn readiness(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<&'static str>>) {
    match state.backend().ping().await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok("ready"))),
        Err(e) => {
            tracing::warn!(error = %e, "Backend not reachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::failure("Backend unavailable")),
            )
        }
    }
}
