//! HTTP route handlers for the storefront.
//!
//! Every response body is an `ApiResponse` envelope.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                             - Liveness check
//! GET  /health/ready                       - Readiness (backend reachable)
//!
//! # Products
//! GET  /products                           - Product listing (search, category, page, limit)
//! GET  /products/{id}                      - Product detail
//! GET  /categories                         - Category listing
//!
//! # Cart (session)
//! GET    /cart                             - Current cart with totals
//! POST   /cart/items                       - Add a product
//! PATCH  /cart/items/{product_id}          - Set quantity (0 removes)
//! POST   /cart/items/{product_id}/decrement - Reduce quantity by one
//! DELETE /cart/items/{product_id}          - Remove a line
//! DELETE /cart                             - Empty the cart
//! POST   /cart/coupon                      - Record a coupon code
//! GET    /cart/shipping-quote              - Shipping cost for the cart
//!
//! # Favorites (session)
//! GET  /favorites                          - Favorite product ids
//! POST /favorites/{product_id}             - Toggle a favorite
//!
//! # Orders and bookings
//! POST /checkout                           - Pay (mock) and place the order
//! POST /appointments                       - Book an appointment
//! ```

pub mod appointments;
pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{product_id}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/items/{product_id}/decrement", post(cart::decrement))
        .route("/coupon", post(cart::apply_coupon))
        .route("/shipping-quote", get(cart::shipping))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/{product_id}", post(favorites::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .route("/checkout", post(checkout::checkout))
        .route("/appointments", post(appointments::book))
}
