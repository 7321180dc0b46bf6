//! Product catalogue handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use clinica_backend::products::{Category, Product, ProductQuery};
use clinica_backend::{ApiResponse, Paginated};
use clinica_core::{Price, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::Caller;
use crate::state::AppState;

/// Largest page size a visitor may request.
const MAX_PAGE_SIZE: u32 = 100;

/// Product with display-ready fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_display: Option<String>,
    pub in_stock: bool,
    pub on_sale: bool,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            price_display: Price::usd(product.price).display(),
            compare_at_display: product
                .compare_at_price
                .filter(|_| product.on_sale())
                .map(|was| Price::usd(was).display()),
            in_stock: product.in_stock(),
            on_sale: product.on_sale(),
            product,
        }
    }
}

/// Clamp visitor-supplied paging to sane bounds.
fn normalize(mut query: ProductQuery) -> ProductQuery {
    query.page = query.page.map(|p| p.max(1));
    query.limit = query.limit.map(|l| l.clamp(1, MAX_PAGE_SIZE));
    query.search = query.search.filter(|s| !s.trim().is_empty());
    query.category = query.category.filter(|s| !s.trim().is_empty());
    query
}

/// List products.
pub async fn index(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Paginated<ProductView>>>> {
    let page = state.catalog().products(&ctx, &normalize(query)).await?;
    let page = Paginated {
        data: page.data.into_iter().map(ProductView::from).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
    };
    Ok(Json(ApiResponse::ok(page)))
}

/// Show one product.
pub async fn show(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductView>>> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .product(&ctx, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(ApiResponse::ok(product.into())))
}

/// List product categories.
pub async fn categories(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.catalog().categories(&ctx).await?;
    Ok(Json(ApiResponse::ok(categories)))
}
