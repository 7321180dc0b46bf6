//! Appointment booking handler.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use clinica_backend::appointments::{Appointment, AppointmentRequest};
use clinica_backend::{ApiResponse, InputError};
use clinica_core::Email;

use crate::error::Result;
use crate::middleware::Caller;
use crate::state::AppState;

/// Booking form body.
#[derive(Debug, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub service: String,
    #[serde(default)]
    pub practitioner: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingForm {
    /// Convert into a validated backend request.
    fn into_request(
        self,
        now: DateTime<Utc>,
    ) -> std::result::Result<AppointmentRequest, InputError> {
        let email =
            Email::parse(&self.email).map_err(|e| InputError::new("email", e.to_string()))?;
        let request = AppointmentRequest {
            customer_name: self.name.trim().to_string(),
            email,
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            service: self.service.trim().to_string(),
            practitioner: self.practitioner.filter(|p| !p.trim().is_empty()),
            scheduled_at: self.scheduled_at,
            duration_minutes: self.duration_minutes.unwrap_or(30),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        };
        request.validate(now)?;
        Ok(request)
    }
}

/// Book an appointment.
#[instrument(skip(state, ctx, form), fields(service = %form.service))]
pub async fn book(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(form): Json<BookingForm>,
) -> Result<(StatusCode, Json<ApiResponse<Appointment>>)> {
    let request = form.into_request(Utc::now())?;
    let response = state.backend().create_appointment(&ctx, &request).await?;
    tracing::info!("Appointment booked");

    let body = ApiResponse {
        message: Some("Appointment booked".to_string()),
        ..response
    };
    Ok((StatusCode::CREATED, Json(body)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn form(email: &str, at: DateTime<Utc>) -> BookingForm {
        BookingForm {
            name: "  Ada ".to_string(),
            email: email.to_string(),
            phone: Some(String::new()),
            service: "Massage".to_string(),
            practitioner: None,
            scheduled_at: at,
            duration_minutes: None,
            notes: None,
        }
    }

    #[test]
    fn test_into_request_normalizes() {
        let now = Utc::now();
        let request = form("ada@clinic.test", now + Duration::days(1))
            .into_request(now)
            .unwrap();
        assert_eq!(request.customer_name, "Ada");
        assert_eq!(request.duration_minutes, 30);
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_into_request_rejects_bad_email_and_past_time() {
        let now = Utc::now();
        let err = form("nope", now + Duration::days(1))
            .into_request(now)
            .unwrap_err();
        assert_eq!(err.field, "email");

        let err = form("ada@clinic.test", now - Duration::days(1))
            .into_request(now)
            .unwrap_err();
        assert_eq!(err.field, "scheduled_at");
    }
}
