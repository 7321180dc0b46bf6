//! Storefront checkout endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clinica_core::{Email, PaymentStatus};

use crate::error::{InputError, require_text};
use crate::orders::{Order, OrderItem};
use crate::{ApiResponse, BackendClient, BackendError, RequestContext};

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Check required address lines.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first missing field.
    pub fn validate(&self) -> Result<(), InputError> {
        require_text("line1", &self.line1)?;
        require_text("city", &self.city)?;
        require_text("postal_code", &self.postal_code)?;
        require_text("country", &self.country)
    }
}

/// Who is placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCustomer {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Outcome of a payment attempt, attached to the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub method: String,
    pub reference: String,
    pub status: PaymentStatus,
    pub amount: Decimal,
}

/// Body for `POST /ecommerce/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer: CheckoutCustomer,
    pub shipping_address: Address,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub payment: PaymentRecord,
}

impl CheckoutRequest {
    /// Check the order before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        require_text("name", &self.customer.name)?;
        self.shipping_address.validate()?;
        if self.items.is_empty() {
            return Err(InputError::new("items", "must not be empty"));
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            return Err(InputError::new("items", "quantities must be positive"));
        }
        Ok(())
    }
}

impl BackendClient {
    /// Submit a storefront order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, request), fields(total = %request.total, items = request.items.len()))]
    pub async fn place_order(
        &self,
        ctx: &RequestContext,
        request: &CheckoutRequest,
    ) -> Result<ApiResponse<Order>, BackendError> {
        self.post(ctx, &["ecommerce", "orders"], request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clinica_core::ProductId;

    use super::*;

    fn address() -> Address {
        Address {
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: Some("IL".to_string()),
            postal_code: "62701".to_string(),
            country: "US".to_string(),
        }
    }

    fn checkout() -> CheckoutRequest {
        CheckoutRequest {
            customer: CheckoutCustomer {
                name: "Pat".to_string(),
                email: Email::parse("pat@x.test").unwrap(),
                phone: None,
            },
            shipping_address: address(),
            items: vec![OrderItem {
                product_id: ProductId::new("p1"),
                name: "Tea".to_string(),
                quantity: 1,
                unit_price: Decimal::new(500, 2),
            }],
            subtotal: Decimal::new(500, 2),
            shipping: Decimal::new(1000, 2),
            tax: Decimal::new(40, 2),
            discount: Decimal::ZERO,
            total: Decimal::new(1540, 2),
            coupon_code: None,
            payment: PaymentRecord {
                method: "card".to_string(),
                reference: "mock_1".to_string(),
                status: PaymentStatus::Paid,
                amount: Decimal::new(1540, 2),
            },
        }
    }

    #[test]
    fn test_valid_checkout() {
        assert!(checkout().validate().is_ok());
    }

    #[test]
    fn test_checkout_requires_items_and_address() {
        let mut empty = checkout();
        empty.items.clear();
        assert_eq!(empty.validate().unwrap_err().field, "items");

        let mut no_city = checkout();
        no_city.shipping_address.city = String::new();
        assert_eq!(no_city.validate().unwrap_err().field, "city");
    }

    #[test]
    fn test_checkout_wire_format() {
        let value = serde_json::to_value(checkout()).unwrap();
        assert_eq!(value["shippingAddress"]["postalCode"], "62701");
        assert_eq!(value["items"][0]["unitPrice"], "5.00");
        assert_eq!(value["payment"]["status"], "paid");
        assert_eq!(value["total"], "15.40");
    }
}
