//! HTTP route handlers for admin.
//!
//! Every response body is an `ApiResponse` envelope. All routes except the
//! health checks go through [`RequireBackendAuth`](crate::middleware::RequireBackendAuth).
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness (backend reachable)
//!
//! # Dashboard
//! GET  /dashboard                       - Analytics summary
//!
//! # Orders (backend)
//! GET   /orders                         - Order listing (status, customerId, page, limit)
//! GET   /orders/{id}                    - Order detail
//! PATCH /orders/{id}/status             - Change status (notifies)
//!
//! # Customers (backend)
//! GET   /customers                      - Customer listing (search, page, limit)
//! POST  /customers                      - Create customer
//! GET   /customers/{id}                 - Customer detail
//! PATCH /customers/{id}                 - Update customer
//!
//! # Products (backend)
//! GET    /products                      - Product listing
//! POST   /products                      - Create product
//! PATCH  /products/{id}                 - Update product
//! DELETE /products/{id}                 - Delete product
//!
//! # Appointments (backend)
//! GET    /appointments                  - Listing (status, from, to, page, limit)
//! GET    /appointments/{id}             - Detail
//! PATCH  /appointments/{id}             - Reschedule or annotate
//! PATCH  /appointments/{id}/status      - Change status (checked transitions, notifies)
//! DELETE /appointments/{id}             - Delete
//!
//! # Schedules (in memory)
//! GET    /schedules                     - Filtered listing
//! POST   /schedules                     - Create
//! DELETE /schedules                     - Remove all
//! POST   /schedules/generate            - Generate mock schedules
//! GET    /schedules/stats               - Counts and upcoming
//! PATCH  /schedules/{id}                - Update
//! DELETE /schedules/{id}                - Remove one
//! PUT    /schedules/{id}/status         - Change status (notifies)
//!
//! # Notifications (session)
//! GET    /notifications                 - Newest first, with unread count
//! DELETE /notifications                 - Clear
//! POST   /notifications/read-all        - Mark all read
//! POST   /notifications/{id}/read       - Mark one read
//! DELETE /notifications/{id}            - Dismiss one
//!
//! # Preferences (session)
//! GET  /preferences/theme               - Current theme
//! PUT  /preferences/theme               - Set theme
//! POST /preferences/theme/toggle        - Flip light/dark
//! ```

pub mod appointments;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod preferences;
pub mod products;
pub mod schedules;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Default page size for backend listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size an admin may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamp paging parameters, filling in the default page size.
pub(crate) fn clamp_paging(page: Option<u32>, limit: Option<u32>) -> (Option<u32>, Option<u32>) {
    (
        Some(page.unwrap_or(1).max(1)),
        Some(limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)),
    )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::create))
        .route("/{id}", get(customers::show).patch(customers::update))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", patch(products::update).delete(products::delete))
}

/// Create the appointment routes router.
pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(appointments::index))
        .route(
            "/{id}",
            get(appointments::show)
                .patch(appointments::update)
                .delete(appointments::delete),
        )
        .route("/{id}/status", patch(appointments::update_status))
}

/// Create the schedule routes router.
pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(schedules::index)
                .post(schedules::create)
                .delete(schedules::clear),
        )
        .route("/generate", post(schedules::generate))
        .route("/stats", get(schedules::stats))
        .route(
            "/{id}",
            patch(schedules::update).delete(schedules::delete),
        )
        .route("/{id}/status", put(schedules::set_status))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index).delete(notifications::clear))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/{id}", axum::routing::delete(notifications::dismiss))
}

/// Create the preference routes router.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/theme", get(preferences::show).put(preferences::set))
        .route("/theme/toggle", post(preferences::toggle))
}

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/dashboard", get(dashboard::dashboard))
        .nest("/orders", order_routes())
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
        .nest("/appointments", appointment_routes())
        .nest("/schedules", schedule_routes())
        .nest("/notifications", notification_routes())
        .nest("/preferences", preference_routes())
}
