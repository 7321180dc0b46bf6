//! Order management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tower_sessions::Session;
use tracing::instrument;

use clinica_backend::appointments::StatusUpdate;
use clinica_backend::orders::{Order, OrderQuery};
use clinica_backend::{ApiResponse, Paginated};
use clinica_core::notifications::NotificationLevel;
use clinica_core::{OrderId, OrderStatus, StatusBadge};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireBackendAuth;
use crate::models::notify;
use crate::state::AppState;

use super::clamp_paging;

/// List orders, optionally filtered by status or customer.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Query(mut query): Query<OrderQuery>,
) -> Result<Json<ApiResponse<Paginated<Order>>>> {
    (query.page, query.limit) = clamp_paging(query.page, query.limit);
    Ok(Json(state.backend().list_orders(&ctx, &query).await?))
}

/// Show one order.
#[instrument(skip(ctx, state))]
pub async fn show(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>> {
    Ok(Json(state.backend().get_order(&ctx, &OrderId::new(id)).await?))
}

/// Change an order's status and notify the session.
#[instrument(skip(ctx, state, session))]
pub async fn update_status(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate<OrderStatus>>,
) -> Result<Json<ApiResponse<Order>>> {
    let id = OrderId::new(id);
    let mut response = state
        .backend()
        .update_order_status(&ctx, &id, update.status)
        .await?;

    let reference = response
        .data
        .as_ref()
        .map_or_else(|| id.to_string(), |order| order.reference().to_string());
    let message = format!("Order {reference} is now {}", update.status.label());

    add_breadcrumb(
        "order",
        "Order status changed",
        &[("order_id", id.as_str()), ("status", update.status.as_str())],
    );
    notify(&session, NotificationLevel::Success, "Order updated", message.clone()).await?;
    tracing::info!(order_id = %id, status = %update.status, "Order status updated");

    response.message = Some(message);
    Ok(Json(response))
}
