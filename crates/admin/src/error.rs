//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`; every error body is a
//! failed [`ApiResponse`] envelope. Server-side faults are captured to
//! Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use clinica_backend::{ApiResponse, BackendError, ErrorCategory, InputError};
use clinica_core::schedule::ScheduleError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Submitted data failed validation.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Schedule book rejected the change.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Caller has no `auth_token` while auth is enabled.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Backend(err) => backend_status(err),
            Self::Schedule(ScheduleError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Input(_) | Self::Schedule(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Internal details are never exposed.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Backend(err) => err.user_message(),
            Self::Input(err) => err.to_string(),
            Self::Schedule(err) => err.to_string(),
            Self::Unauthorized => ErrorCategory::Auth.user_message().to_string(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(message) => message.clone(),
        }
    }

    fn is_server_fault(&self) -> bool {
        match self {
            Self::Backend(err) => matches!(
                err.category(),
                ErrorCategory::Server | ErrorCategory::Network | ErrorCategory::Unknown
            ),
            Self::Session(_) | Self::Internal(_) => true,
            _ => false,
        }
    }
}

/// Map a backend failure onto the status this service answers with.
fn backend_status(err: &BackendError) -> StatusCode {
    match err.status() {
        Some(404) => StatusCode::NOT_FOUND,
        Some(status @ (400 | 401 | 403 | 409 | 422)) => {
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        Some(_) => StatusCode::BAD_GATEWAY,
        None => match err.category() {
            ErrorCategory::Network => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let status = self.status();
        let body = ApiResponse::<()>::failure(self.public_message());
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for admin actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
