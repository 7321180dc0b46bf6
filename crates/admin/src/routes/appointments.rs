//! Appointment management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tower_sessions::Session;
use tracing::instrument;

use clinica_backend::appointments::{
    Appointment, AppointmentPatch, AppointmentQuery, StatusUpdate,
};
use clinica_backend::{ApiResponse, Paginated};
use clinica_core::notifications::NotificationLevel;
use clinica_core::{AppointmentId, AppointmentStatus, StatusBadge};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireBackendAuth;
use crate::models::notify;
use crate::state::AppState;

use super::clamp_paging;

/// List appointments, optionally filtered by status and date range.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Query(mut query): Query<AppointmentQuery>,
) -> Result<Json<ApiResponse<Paginated<Appointment>>>> {
    if query.from.zip(query.to).is_some_and(|(from, to)| from > to) {
        return Err(AppError::BadRequest(
            "`from` must not be after `to`".to_string(),
        ));
    }
    (query.page, query.limit) = clamp_paging(query.page, query.limit);
    Ok(Json(state.backend().list_appointments(&ctx, &query).await?))
}

/// Show one appointment.
#[instrument(skip(ctx, state))]
pub async fn show(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Appointment>>> {
    Ok(Json(
        state
            .backend()
            .get_appointment(&ctx, &AppointmentId::new(id))
            .await?,
    ))
}

/// Reschedule or annotate an appointment.
#[instrument(skip(ctx, state, patch))]
pub async fn update(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<ApiResponse<Appointment>>> {
    patch.validate()?;
    let id = AppointmentId::new(id);
    let mut response = state.backend().update_appointment(&ctx, &id, &patch).await?;
    add_breadcrumb(
        "appointment",
        "Appointment updated",
        &[("appointment_id", id.as_str())],
    );
    response.message = Some("Appointment updated".to_string());
    Ok(Json(response))
}

/// Move an appointment to a new status and notify the session.
///
/// The current status is read first; transitions out of a terminal status
/// or that skip backwards are rejected with 400.
#[instrument(skip(ctx, state, session))]
pub async fn update_status(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate<AppointmentStatus>>,
) -> Result<Json<ApiResponse<Appointment>>> {
    let id = AppointmentId::new(id);
    let current = state
        .backend()
        .get_appointment(&ctx, &id)
        .await?
        .data
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;

    check_transition(current.status, update.status)?;

    let mut response = state
        .backend()
        .update_appointment_status(&ctx, &id, update.status)
        .await?;

    let message = format!(
        "Appointment for {} is now {}",
        current.customer_name,
        update.status.label()
    );
    let level = match update.status {
        AppointmentStatus::Cancelled | AppointmentStatus::NoShow => NotificationLevel::Warning,
        _ => NotificationLevel::Success,
    };

    add_breadcrumb(
        "appointment",
        "Appointment status changed",
        &[
            ("appointment_id", id.as_str()),
            ("from", current.status.as_str()),
            ("to", update.status.as_str()),
        ],
    );
    notify(&session, level, "Appointment updated", message.clone()).await?;
    tracing::info!(
        appointment_id = %id,
        from = %current.status,
        to = %update.status,
        "Appointment status updated"
    );

    response.message = Some(message);
    Ok(Json(response))
}

/// Delete an appointment.
#[instrument(skip(ctx, state))]
pub async fn delete(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let id = AppointmentId::new(id);
    let mut response = state.backend().delete_appointment(&ctx, &id).await?;
    add_breadcrumb(
        "appointment",
        "Appointment deleted",
        &[("appointment_id", id.as_str())],
    );
    response.message = Some("Appointment deleted".to_string());
    Ok(Json(response))
}

fn check_transition(from: AppointmentStatus, to: AppointmentStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Cannot change appointment from {} to {}",
            from.label(),
            to.label()
        )))
    }
}
