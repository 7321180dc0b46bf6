//! Mock schedule calendar handlers.
//!
//! Schedules are demo data held in memory and shared by every admin
//! session; nothing here reaches the backend.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use clinica_backend::ApiResponse;
use clinica_core::StatusBadge;
use clinica_core::notifications::NotificationLevel;
use clinica_core::schedule::{
    NewSchedule, Schedule, ScheduleError, ScheduleFilter, ScheduleOverrides, SchedulePatch,
    ScheduleStatus, StatusCount, generate_schedule,
};

use crate::error::{AppError, Result};
use crate::middleware::RequireBackendAuth;
use crate::models::notify;
use crate::state::AppState;

/// Most schedules generated by one request.
pub const MAX_GENERATE: usize = 200;

const DEFAULT_GENERATE: usize = 10;

/// Upcoming schedules included in the stats.
const UPCOMING_LIMIT: usize = 5;

/// Body for `POST /schedules/generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub overrides: ScheduleOverrides,
}

/// Body for `PUT /schedules/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: ScheduleStatus,
}

/// Summary of the schedule book.
#[derive(Debug, Serialize)]
pub struct ScheduleStats {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub upcoming: Vec<Schedule>,
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid schedule id: {raw}")))
}

/// List schedules matching the filter, sorted by date.
#[instrument(skip(state))]
pub async fn index(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<Json<ApiResponse<Vec<Schedule>>>> {
    if filter
        .from
        .zip(filter.to)
        .is_some_and(|(from, to)| from > to)
    {
        return Err(AppError::BadRequest(
            "`from` must not be after `to`".to_string(),
        ));
    }
    let book = state.schedules().read().await;
    let schedules = book.filter(&filter).into_iter().cloned().collect();
    Ok(Json(ApiResponse::ok(schedules)))
}

/// Generate mock schedules and add them to the book.
#[instrument(skip(state, request))]
pub async fn generate(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Schedule>>>)> {
    let count = request.count.unwrap_or(DEFAULT_GENERATE);
    if count == 0 || count > MAX_GENERATE {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {MAX_GENERATE}"
        )));
    }

    let now = Utc::now();
    // Invalid overrides fail on the first schedule. The thread-local RNG
    // must be dropped before the lock is awaited.
    let generated = {
        let mut rng = rand::rng();
        (0..count)
            .map(|_| generate_schedule(&mut rng, now, request.overrides.clone()))
            .collect::<std::result::Result<Vec<Schedule>, ScheduleError>>()?
    };

    state.schedules().write().await.extend(generated.clone())?;
    tracing::info!(count, "Generated mock schedules");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            generated,
            format!("Generated {count} schedules"),
        )),
    ))
}

/// Create a schedule from user input.
#[instrument(skip(state, input))]
pub async fn create(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
    Json(input): Json<NewSchedule>,
) -> Result<(StatusCode, Json<ApiResponse<Schedule>>)> {
    let schedule = input.into_schedule(Utc::now())?;
    state.schedules().write().await.insert(schedule.clone())?;
    tracing::info!(schedule_id = %schedule.id, "Schedule created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(schedule, "Schedule created")),
    ))
}

/// Apply a partial update to a schedule.
#[instrument(skip(state, patch))]
pub async fn update(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SchedulePatch>,
) -> Result<Json<ApiResponse<Schedule>>> {
    let id = parse_id(&id)?;
    let mut book = state.schedules().write().await;
    let schedule = book.update(id, patch, Utc::now())?.clone();
    Ok(Json(ApiResponse::ok_with_message(schedule, "Schedule updated")))
}

/// Change a schedule's status and notify the session.
#[instrument(skip(state, session))]
pub async fn set_status(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<ApiResponse<Schedule>>> {
    let id = parse_id(&id)?;
    let schedule = state
        .schedules()
        .write()
        .await
        .set_status(id, body.status, Utc::now())?
        .clone();

    let message = format!("{} is now {}", schedule.title, body.status.label());
    let level = match body.status {
        ScheduleStatus::Cancelled => NotificationLevel::Warning,
        _ => NotificationLevel::Info,
    };
    notify(&session, level, "Schedule updated", message.clone()).await?;

    Ok(Json(ApiResponse::ok_with_message(schedule, message)))
}

/// Delete one schedule.
#[instrument(skip(state))]
pub async fn delete(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Schedule>>> {
    let id = parse_id(&id)?;
    let removed = state
        .schedules()
        .write()
        .await
        .remove(id)
        .ok_or(ScheduleError::NotFound(id))?;
    Ok(Json(ApiResponse::ok_with_message(removed, "Schedule deleted")))
}

/// Delete every schedule.
#[instrument(skip(state))]
pub async fn clear(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
) -> Json<ApiResponse<usize>> {
    let mut book = state.schedules().write().await;
    let removed = book.len();
    book.clear();
    tracing::info!(removed, "Cleared schedules");
    Json(ApiResponse::ok_with_message(
        removed,
        format!("Removed {removed} schedules"),
    ))
}

/// Counts per status plus the next few open schedules.
#[instrument(skip(state))]
pub async fn stats(
    RequireBackendAuth(_): RequireBackendAuth,
    State(state): State<AppState>,
) -> Json<ApiResponse<ScheduleStats>> {
    let book = state.schedules().read().await;
    let stats = ScheduleStats {
        total: book.len(),
        by_status: book.status_counts(),
        upcoming: book
            .upcoming(Utc::now(), UPCOMING_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
    };
    Json(ApiResponse::ok(stats))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        let err = parse_id("nope").unwrap_err();
        assert_eq!(err.public_message(), "Invalid schedule id: nope");
    }

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.count.is_none());
        assert!(request.overrides.status.is_none());

        let request: GenerateRequest =
            serde_json::from_str(r#"{"count": 3, "overrides": {"status": "completed"}}"#).unwrap();
        assert_eq!(request.count, Some(3));
        assert_eq!(request.overrides.status, Some(ScheduleStatus::Completed));
    }
}
