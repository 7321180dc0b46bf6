//! Clinic appointment endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clinica_core::envelope::ListPayload;
use clinica_core::{AppointmentId, AppointmentStatus, Email};

use crate::error::{InputError, require_text};
use crate::{ApiResponse, BackendClient, BackendError, Paginated, RequestContext};

const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Longest appointment the booking form accepts.
pub const MAX_DURATION_MINUTES: u32 = 480;

/// An appointment as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub service: String,
    #[serde(default)]
    pub practitioner: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl Appointment {
    /// Whether the appointment is still ahead and not closed out.
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at > now && !self.status.is_terminal()
    }
}

/// Body for booking an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub customer_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentRequest {
    /// Check the booking before it is sent.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), InputError> {
        require_text("name", &self.customer_name)?;
        require_text("service", &self.service)?;
        if self.scheduled_at <= now {
            return Err(InputError::new("scheduled_at", "must be in the future"));
        }
        validate_duration(self.duration_minutes)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Partial update of an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentPatch {
    /// Check any fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(minutes) = self.duration_minutes {
            validate_duration(minutes)?;
        }
        Ok(())
    }
}

/// Body for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

/// Filters for the appointment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

fn validate_duration(minutes: u32) -> Result<(), InputError> {
    if minutes == 0 || minutes > MAX_DURATION_MINUTES {
        return Err(InputError::new(
            "duration_minutes",
            format!("must be between 1 and {MAX_DURATION_MINUTES}"),
        ));
    }
    Ok(())
}

/// Phone numbers: digits with optional `+`, spaces, dashes, dots and parentheses.
fn validate_phone(phone: &str) -> Result<(), InputError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'));
    if !allowed || !(7..=15).contains(&digits) {
        return Err(InputError::new("phone", "must be a valid phone number"));
    }
    Ok(())
}

// =============================================================================
// Endpoints
// =============================================================================

impl BackendClient {
    /// List appointments.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx))]
    pub async fn list_appointments(
        &self,
        ctx: &RequestContext,
        query: &AppointmentQuery,
    ) -> Result<ApiResponse<Paginated<Appointment>>, BackendError> {
        let response: ApiResponse<ListPayload<Appointment>> =
            self.get_with_query(ctx, &["appointments"], query).await?;
        Ok(response.map(ListPayload::into_page))
    }

    /// Fetch one appointment.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(appointment_id = %id))]
    pub async fn get_appointment(
        &self,
        ctx: &RequestContext,
        id: &AppointmentId,
    ) -> Result<ApiResponse<Appointment>, BackendError> {
        self.get(ctx, &["appointments", id.as_str()]).await
    }

    /// Book an appointment.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, request), fields(service = %request.service))]
    pub async fn create_appointment(
        &self,
        ctx: &RequestContext,
        request: &AppointmentRequest,
    ) -> Result<ApiResponse<Appointment>, BackendError> {
        self.post(ctx, &["appointments"], request).await
    }

    /// Update an appointment's details.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, patch), fields(appointment_id = %id))]
    pub async fn update_appointment(
        &self,
        ctx: &RequestContext,
        id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<ApiResponse<Appointment>, BackendError> {
        self.patch(ctx, &["appointments", id.as_str()], patch).await
    }

    /// Change an appointment's status.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(appointment_id = %id))]
    pub async fn update_appointment_status(
        &self,
        ctx: &RequestContext,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<ApiResponse<Appointment>, BackendError> {
        self.patch(
            ctx,
            &["appointments", id.as_str(), "status"],
            &StatusUpdate { status },
        )
        .await
    }

    /// Delete an appointment.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(appointment_id = %id))]
    pub async fn delete_appointment(
        &self,
        ctx: &RequestContext,
        id: &AppointmentId,
    ) -> Result<ApiResponse<serde_json::Value>, BackendError> {
        self.delete(ctx, &["appointments", id.as_str()]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn request(now: DateTime<Utc>) -> AppointmentRequest {
        AppointmentRequest {
            customer_name: "Ada Lovelace".to_string(),
            email: Email::parse("ada@clinic.test").unwrap(),
            phone: Some("+1 (555) 010-2030".to_string()),
            service: "Physiotherapy".to_string(),
            practitioner: None,
            scheduled_at: now + Duration::days(2),
            duration_minutes: 45,
            notes: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let now = Utc::now();
        assert!(request(now).validate(now).is_ok());
    }

    #[test]
    fn test_request_rejects_past_and_blank() {
        let now = Utc::now();

        let mut past = request(now);
        past.scheduled_at = now - Duration::hours(1);
        assert_eq!(past.validate(now).unwrap_err().field, "scheduled_at");

        let mut nameless = request(now);
        nameless.customer_name = String::new();
        assert_eq!(nameless.validate(now).unwrap_err().field, "name");

        let mut long = request(now);
        long.duration_minutes = MAX_DURATION_MINUTES + 1;
        assert_eq!(long.validate(now).unwrap_err().field, "duration_minutes");

        let mut bad_phone = request(now);
        bad_phone.phone = Some("call me".to_string());
        assert_eq!(bad_phone.validate(now).unwrap_err().field, "phone");
    }

    #[test]
    fn test_request_wire_format() {
        let now = Utc::now();
        let value = serde_json::to_value(request(now)).unwrap();
        assert_eq!(value["customerName"], "Ada Lovelace");
        assert_eq!(value["email"], "ada@clinic.test");
        assert_eq!(value["durationMinutes"], 45);
        assert!(value.get("practitioner").is_none());
    }

    #[test]
    fn test_appointment_defaults_and_upcoming() {
        let json = r#"{
            "id": "apt_1",
            "customerName": "Grace",
            "service": "Checkup",
            "scheduledAt": "2099-01-01T09:00:00Z"
        }"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.duration_minutes, 30);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert!(appointment.is_upcoming(Utc::now()));

        let cancelled = Appointment {
            status: AppointmentStatus::Cancelled,
            ..appointment
        };
        assert!(!cancelled.is_upcoming(Utc::now()));
    }

    #[test]
    fn test_status_update_body() {
        let body = StatusUpdate {
            status: AppointmentStatus::NoShow,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"no_show"}"#
        );
    }
}
