//! Theme preference handlers.

use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use clinica_backend::ApiResponse;
use clinica_core::preferences::Theme;

use crate::error::{AppError, Result};
use crate::middleware::RequireBackendAuth;
use crate::models::{load, save, session_keys};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThemeView {
    pub theme: Theme,
}

/// Body for `PUT /preferences/theme`. Accepts any case and `auto`.
#[derive(Debug, Deserialize)]
pub struct ThemeBody {
    pub theme: String,
}

/// Current theme (defaults to `system`).
#[instrument(skip(session))]
pub async fn show(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
) -> Json<ApiResponse<ThemeView>> {
    let theme: Theme = load(&session, session_keys::THEME).await;
    Json(ApiResponse::ok(ThemeView { theme }))
}

/// Set the theme.
#[instrument(skip(session))]
pub async fn set(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ApiResponse<ThemeView>>> {
    let theme: Theme = body.theme.parse().map_err(AppError::BadRequest)?;
    save(&session, session_keys::THEME, &theme).await?;
    Ok(Json(ApiResponse::ok(ThemeView { theme })))
}

/// Flip between light and dark.
#[instrument(skip(session))]
pub async fn toggle(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
) -> Result<Json<ApiResponse<ThemeView>>> {
    let theme = load::<Theme>(&session, session_keys::THEME).await.toggle();
    save(&session, session_keys::THEME, &theme).await?;
    Ok(Json(ApiResponse::ok_with_message(
        ThemeView { theme },
        format!("Switched to {} theme", theme.as_str()),
    )))
}
