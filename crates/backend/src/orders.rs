//! Order management endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clinica_core::envelope::ListPayload;
use clinica_core::{CustomerId, OrderId, OrderStatus, PaymentStatus, ProductId};

use crate::appointments::StatusUpdate;
use crate::ecommerce::Address;
use crate::{ApiResponse, BackendClient, BackendError, Paginated, RequestContext};

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Customer summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default)]
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
}

/// An order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Order number if the backend assigned one, else the id.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.order_number.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Filters for the order listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// =============================================================================
// Endpoints
// =============================================================================

impl BackendClient {
    /// List orders.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx))]
    pub async fn list_orders(
        &self,
        ctx: &RequestContext,
        query: &OrderQuery,
    ) -> Result<ApiResponse<Paginated<Order>>, BackendError> {
        let response: ApiResponse<ListPayload<Order>> =
            self.get_with_query(ctx, &["orders"], query).await?;
        Ok(response.map(ListPayload::into_page))
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(order_id = %id))]
    pub async fn get_order(
        &self,
        ctx: &RequestContext,
        id: &OrderId,
    ) -> Result<ApiResponse<Order>, BackendError> {
        self.get(ctx, &["orders", id.as_str()]).await
    }

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(order_id = %id))]
    pub async fn update_order_status(
        &self,
        ctx: &RequestContext,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<ApiResponse<Order>, BackendError> {
        self.patch(ctx, &["orders", id.as_str(), "status"], &StatusUpdate { status })
            .await
    }
}
