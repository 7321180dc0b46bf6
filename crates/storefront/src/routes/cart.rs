//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Items are added with the
//! backend's current price as a snapshot; later price changes do not
//! affect lines already in the cart.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use clinica_backend::ApiResponse;
use clinica_core::ProductId;
use clinica_core::cart::{Cart, CartAction, CartItem, ShippingQuote, shipping_quote};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Caller;
use crate::models::{load, save, session_keys};
use crate::state::AppState;

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Quantity update body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Coupon body.
#[derive(Debug, Deserialize)]
pub struct CouponRequest {
    pub code: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_cart(session: &Session) -> Cart {
    load(session, session_keys::CART).await
}

/// Apply an action, persist the cart and return it.
async fn commit(session: &Session, mut cart: Cart, action: CartAction) -> Result<Cart> {
    cart.dispatch(action);
    save(session, session_keys::CART, &cart).await?;
    Ok(cart)
}

/// Apply an action to an existing line, or 404 if the product is not in the cart.
async fn mutate_line(
    session: &Session,
    product_id: &ProductId,
    action: CartAction,
) -> Result<Cart> {
    let cart = load_cart(session).await;
    if cart.quantity_of(product_id).is_none() {
        return Err(AppError::NotFound(format!("cart item {product_id}")));
    }
    commit(session, cart, action).await
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
pub async fn show(session: Session) -> Json<ApiResponse<Cart>> {
    Json(ApiResponse::ok(load_cart(&session).await))
}

/// Add a product to the cart.
///
/// The product is fetched first so the line carries the current name,
/// price and image. Inactive and out-of-stock products are rejected, as is
/// any quantity beyond the available stock.
#[instrument(skip(state, ctx, session))]
pub async fn add(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    session: Session,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<Cart>>> {
    if body.quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }

    let product = state
        .catalog()
        .product(&ctx, &body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    if !product.is_active {
        return Err(AppError::BadRequest(format!(
            "{} is no longer available",
            product.name
        )));
    }
    if !product.in_stock() {
        return Err(AppError::BadRequest(format!("{} is out of stock", product.name)));
    }

    let cart = load_cart(&session).await;
    let wanted = cart
        .quantity_of(&product.id)
        .unwrap_or(0)
        .saturating_add(body.quantity);
    if i64::from(wanted) > product.stock {
        return Err(AppError::BadRequest(format!(
            "Only {} of {} left in stock",
            product.stock, product.name
        )));
    }

    add_breadcrumb("cart", "Added to cart", &[("product_id", product.id.as_str())]);

    let message = format!("Added {} to cart", product.name);
    let item = CartItem::new(product.id, product.name, product.price, body.quantity)
        .with_image(product.image_url);
    let cart = commit(&session, cart, CartAction::AddItem(item)).await?;
    Ok(Json(ApiResponse::ok_with_message(cart, message)))
}

/// Set the quantity of a line; zero removes it.
pub async fn update(
    session: Session,
    Path(product_id): Path<String>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<ApiResponse<Cart>>> {
    let product_id = ProductId::new(product_id);
    let action = CartAction::UpdateQuantity {
        product_id: product_id.clone(),
        quantity: body.quantity,
    };
    let cart = mutate_line(&session, &product_id, action).await?;
    Ok(Json(ApiResponse::ok(cart)))
}

/// Reduce a line by one.
pub async fn decrement(
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<Cart>>> {
    let product_id = ProductId::new(product_id);
    let action = CartAction::DecrementItem {
        product_id: product_id.clone(),
    };
    let cart = mutate_line(&session, &product_id, action).await?;
    Ok(Json(ApiResponse::ok(cart)))
}

/// Remove a line.
pub async fn remove(
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<Cart>>> {
    let product_id = ProductId::new(product_id);
    let action = CartAction::RemoveItem {
        product_id: product_id.clone(),
    };
    let cart = mutate_line(&session, &product_id, action).await?;
    Ok(Json(ApiResponse::ok_with_message(cart, "Item removed")))
}

/// Empty the cart.
pub async fn clear(session: Session) -> Result<Json<ApiResponse<Cart>>> {
    let cart = commit(&session, load_cart(&session).await, CartAction::Clear).await?;
    Ok(Json(ApiResponse::ok_with_message(cart, "Cart cleared")))
}

/// Record a coupon code on the cart.
///
/// There is no coupon source, so the code is stored for the order but never
/// recognised and the discount stays zero.
pub async fn apply_coupon(
    session: Session,
    Json(body): Json<CouponRequest>,
) -> Result<Json<ApiResponse<Cart>>> {
    if body.code.trim().is_empty() {
        return Err(AppError::BadRequest("Coupon code is required".to_string()));
    }
    let cart = commit(
        &session,
        load_cart(&session).await,
        CartAction::ApplyCoupon { code: body.code },
    )
    .await?;
    let message = format!(
        "Coupon {} is not recognised; no discount applied",
        cart.coupon_code.as_deref().unwrap_or_default()
    );
    Ok(Json(ApiResponse::ok_with_message(cart, message)))
}

/// Quote shipping for the current cart.
pub async fn shipping(session: Session) -> Json<ApiResponse<ShippingQuote>> {
    let cart = load_cart(&session).await;
    Json(ApiResponse::ok(shipping_quote(cart.totals.subtotal)))
}
