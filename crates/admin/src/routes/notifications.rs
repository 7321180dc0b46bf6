//! Notification centre handlers.

use axum::{Json, extract::Path};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use clinica_backend::ApiResponse;
use clinica_core::notifications::{Notification, NotificationAction, NotificationCenter};

use crate::error::{AppError, Result};
use crate::middleware::RequireBackendAuth;
use crate::models::{load, save, session_keys};

/// Notifications with the unread badge count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsView {
    pub items: Vec<Notification>,
    pub unread_count: usize,
}

impl From<&NotificationCenter> for NotificationsView {
    fn from(center: &NotificationCenter) -> Self {
        Self {
            items: center.items().to_vec(),
            unread_count: center.unread_count(),
        }
    }
}

/// Apply an action to the session's centre and return the result.
async fn apply(session: &Session, action: NotificationAction) -> Result<NotificationsView> {
    let missing = match &action {
        NotificationAction::MarkRead(id) | NotificationAction::Dismiss(id) => Some(*id),
        _ => None,
    };

    let mut center: NotificationCenter = load(session, session_keys::NOTIFICATIONS).await;
    if !center.dispatch(action) {
        let id = missing.map(|id| id.to_string()).unwrap_or_default();
        return Err(AppError::NotFound(format!("notification {id}")));
    }
    save(session, session_keys::NOTIFICATIONS, &center).await?;
    Ok(NotificationsView::from(&center))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid notification id: {raw}")))
}

/// List notifications, newest first.
#[instrument(skip(session))]
pub async fn index(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
) -> Json<ApiResponse<NotificationsView>> {
    let center: NotificationCenter = load(&session, session_keys::NOTIFICATIONS).await;
    Json(ApiResponse::ok(NotificationsView::from(&center)))
}

/// Mark one notification read.
#[instrument(skip(session))]
pub async fn mark_read(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NotificationsView>>> {
    let id = parse_id(&id)?;
    let view = apply(&session, NotificationAction::MarkRead(id)).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// Mark every notification read.
#[instrument(skip(session))]
pub async fn mark_all_read(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
) -> Result<Json<ApiResponse<NotificationsView>>> {
    let view = apply(&session, NotificationAction::MarkAllRead).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// Dismiss one notification.
#[instrument(skip(session))]
pub async fn dismiss(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NotificationsView>>> {
    let id = parse_id(&id)?;
    let view = apply(&session, NotificationAction::Dismiss(id)).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// Remove every notification.
#[instrument(skip(session))]
pub async fn clear(
    RequireBackendAuth(_): RequireBackendAuth,
    session: Session,
) -> Result<Json<ApiResponse<NotificationsView>>> {
    let view = apply(&session, NotificationAction::Clear).await?;
    Ok(Json(ApiResponse::ok_with_message(view, "Notifications cleared")))
}
