//! Customer management endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clinica_core::envelope::ListPayload;
use clinica_core::{CustomerId, Email};

use crate::error::{InputError, require_text};
use crate::{ApiResponse, BackendClient, BackendError, Paginated, RequestContext};

/// A customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub orders_count: u32,
    #[serde(default)]
    pub total_spent: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Body for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerInput {
    /// Check the fields the backend would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        require_text("first_name", &self.first_name)
    }
}

/// Partial update of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerPatch {
    /// Check any fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(first_name) = &self.first_name {
            require_text("first_name", first_name)?;
        }
        Ok(())
    }
}

/// Filters for the customer listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// =============================================================================
// Endpoints
// =============================================================================

impl BackendClient {
    /// List customers.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx))]
    pub async fn list_customers(
        &self,
        ctx: &RequestContext,
        query: &CustomerQuery,
    ) -> Result<ApiResponse<Paginated<Customer>>, BackendError> {
        let response: ApiResponse<ListPayload<Customer>> =
            self.get_with_query(ctx, &["customers"], query).await?;
        Ok(response.map(ListPayload::into_page))
    }

    /// Fetch one customer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(customer_id = %id))]
    pub async fn get_customer(
        &self,
        ctx: &RequestContext,
        id: &CustomerId,
    ) -> Result<ApiResponse<Customer>, BackendError> {
        self.get(ctx, &["customers", id.as_str()]).await
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, input))]
    pub async fn create_customer(
        &self,
        ctx: &RequestContext,
        input: &CustomerInput,
    ) -> Result<ApiResponse<Customer>, BackendError> {
        self.post(ctx, &["customers"], input).await
    }

    /// Update a customer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, patch), fields(customer_id = %id))]
    pub async fn update_customer(
        &self,
        ctx: &RequestContext,
        id: &CustomerId,
        patch: &CustomerPatch,
    ) -> Result<ApiResponse<Customer>, BackendError> {
        self.patch(ctx, &["customers", id.as_str()], patch).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_from_backend_json() {
        let customer: Customer = serde_json::from_str(
            r#"{"id":"c1","firstName":"Ada","lastName":"Byron","email":"ada@x.test","ordersCount":4,"totalSpent":"120.50"}"#,
        )
        .unwrap();
        assert_eq!(customer.full_name(), "Ada Byron");
        assert_eq!(customer.orders_count, 4);
        assert_eq!(customer.total_spent, Decimal::new(12050, 2));
    }

    #[test]
    fn test_full_name_without_last_name() {
        let customer: Customer =
            serde_json::from_str(r#"{"id":"c1","firstName":"Cher","email":"c@x.test"}"#).unwrap();
        assert_eq!(customer.full_name(), "Cher");
    }

    #[test]
    fn test_input_rejects_bad_email_at_parse_time() {
        let parsed: Result<CustomerInput, _> =
            serde_json::from_str(r#"{"firstName":"Ada","email":"not-an-email"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validation() {
        let input: CustomerInput =
            serde_json::from_str(r#"{"firstName":"  ","email":"a@b.test"}"#).unwrap();
        assert_eq!(input.validate().unwrap_err().field, "first_name");

        let patch = CustomerPatch {
            first_name: Some(String::new()),
            ..CustomerPatch::default()
        };
        assert!(patch.validate().is_err());
    }
}
