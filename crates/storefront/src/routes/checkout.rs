//! Checkout handler.
//!
//! Checkout charges the mock payment gateway, submits the order to the
//! backend and empties the cart only once the backend has accepted it.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use clinica_backend::ApiResponse;
use clinica_backend::ecommerce::{Address, CheckoutCustomer, CheckoutRequest};
use clinica_backend::orders::{Order, OrderItem};
use clinica_core::cart::{Cart, CartAction};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Caller;
use crate::models::{load, save, session_keys};
use crate::state::AppState;

/// Checkout form body.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer: CheckoutCustomer,
    pub shipping_address: Address,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "card".to_string()
}

/// Place an order for the session cart.
#[instrument(skip(state, ctx, session, form))]
pub async fn checkout(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let mut cart: Cart = load(&session, session_keys::CART).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }
    form.shipping_address.validate()?;

    let payment = state
        .payments()
        .charge(&form.payment_method, cart.totals.total)?;

    let request = CheckoutRequest {
        customer: form.customer,
        shipping_address: form.shipping_address,
        items: cart
            .items
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect(),
        subtotal: cart.totals.subtotal,
        shipping: cart.totals.shipping,
        tax: cart.totals.tax,
        discount: cart.totals.discount,
        total: cart.totals.total,
        coupon_code: cart.coupon_code.clone(),
        payment,
    };
    request.validate()?;

    let response = state.backend().place_order(&ctx, &request).await?;

    cart.dispatch(CartAction::Clear);
    save(&session, session_keys::CART, &cart).await?;

    let reference = response
        .data
        .as_ref()
        .map(|order| order.reference().to_string())
        .unwrap_or_default();
    add_breadcrumb("checkout", "Order placed", &[("order", reference.as_str())]);
    tracing::info!(order = %reference, total = %request.total, "Order placed");

    let body = ApiResponse {
        message: Some("Order placed".to_string()),
        ..response
    };
    Ok((StatusCode::CREATED, Json(body)))
}
