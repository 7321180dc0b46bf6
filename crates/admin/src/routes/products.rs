//! Product management handlers.
//!
//! Admin reads go straight to the backend; the storefront keeps its own
//! cache and picks up changes when it expires.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use clinica_backend::products::{Product, ProductInput, ProductPatch, ProductQuery};
use clinica_backend::{ApiResponse, Paginated};
use clinica_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireBackendAuth;
use crate::state::AppState;

use super::clamp_paging;

/// List products, including inactive ones.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Query(mut query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Paginated<Product>>>> {
    (query.page, query.limit) = clamp_paging(query.page, query.limit);
    Ok(Json(state.backend().list_products(&ctx, &query).await?))
}

/// Create a product.
#[instrument(skip(ctx, state, input), fields(name = %input.name))]
pub async fn create(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    input.validate()?;
    let mut response = state.backend().create_product(&ctx, &input).await?;
    add_breadcrumb("product", "Product created", &[("name", &input.name)]);
    response.message = Some(format!("Product {} created", input.name.trim()));
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a product.
#[instrument(skip(ctx, state, patch))]
pub async fn update(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ApiResponse<Product>>> {
    patch.validate()?;
    let id = ProductId::new(id);
    let mut response = state.backend().update_product(&ctx, &id, &patch).await?;
    add_breadcrumb("product", "Product updated", &[("product_id", id.as_str())]);
    response.message = Some("Product updated".to_string());
    Ok(Json(response))
}

/// Delete a product.
#[instrument(skip(ctx, state))]
pub async fn delete(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let id = ProductId::new(id);
    let mut response = state.backend().delete_product(&ctx, &id).await?;
    add_breadcrumb("product", "Product deleted", &[("product_id", id.as_str())]);
    tracing::info!(product_id = %id, "Product deleted");
    response.message = Some("Product deleted".to_string());
    Ok(Json(response))
}
