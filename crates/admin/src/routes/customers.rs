//! Customer management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use clinica_backend::customers::{Customer, CustomerInput, CustomerPatch, CustomerQuery};
use clinica_backend::{ApiResponse, Paginated};
use clinica_core::CustomerId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireBackendAuth;
use crate::state::AppState;

use super::clamp_paging;

/// List customers, optionally matching a search term.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Query(mut query): Query<CustomerQuery>,
) -> Result<Json<ApiResponse<Paginated<Customer>>>> {
    (query.page, query.limit) = clamp_paging(query.page, query.limit);
    query.search = query.search.filter(|s| !s.trim().is_empty());
    Ok(Json(state.backend().list_customers(&ctx, &query).await?))
}

/// Show one customer.
#[instrument(skip(ctx, state))]
pub async fn show(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Customer>>> {
    Ok(Json(
        state
            .backend()
            .get_customer(&ctx, &CustomerId::new(id))
            .await?,
    ))
}

/// Create a customer.
#[instrument(skip(ctx, state, input))]
pub async fn create(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>)> {
    input.validate()?;
    let mut response = state.backend().create_customer(&ctx, &input).await?;
    add_breadcrumb("customer", "Customer created", &[]);
    response.message = Some("Customer created".to_string());
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a customer.
#[instrument(skip(ctx, state, patch))]
pub async fn update(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<ApiResponse<Customer>>> {
    patch.validate()?;
    let id = CustomerId::new(id);
    let mut response = state.backend().update_customer(&ctx, &id, &patch).await?;
    add_breadcrumb("customer", "Customer updated", &[("customer_id", id.as_str())]);
    response.message = Some("Customer updated".to_string());
    Ok(Json(response))
}
