//! Dashboard handler.

use axum::{Json, extract::State};
use chrono::Utc;
use tracing::instrument;

use clinica_backend::appointments::AppointmentQuery;
use clinica_backend::customers::CustomerQuery;
use clinica_backend::orders::OrderQuery;
use clinica_backend::products::ProductQuery;
use clinica_backend::{ApiResponse, Paginated};

use crate::error::Result;
use crate::middleware::RequireBackendAuth;
use crate::services::{DashboardInput, DashboardMetrics, summarize};
use crate::state::AppState;

/// Records fetched per listing for the dashboard.
const DASHBOARD_SAMPLE: u32 = 100;

fn rows<T>(response: ApiResponse<Paginated<T>>) -> (Vec<T>, u64) {
    response
        .data
        .map(|page| (page.data, page.total))
        .unwrap_or_default()
}

/// Dashboard overview.
///
/// The four backend listings are fetched concurrently; any failure fails
/// the whole dashboard.
#[instrument(skip(ctx, state))]
pub async fn dashboard(
    RequireBackendAuth(ctx): RequireBackendAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardMetrics>>> {
    let backend = state.backend();
    let sample = Some(DASHBOARD_SAMPLE);

    let order_query = OrderQuery {
        limit: sample,
        ..OrderQuery::default()
    };
    let appointment_query = AppointmentQuery {
        limit: sample,
        ..AppointmentQuery::default()
    };
    let product_query = ProductQuery {
        limit: sample,
        ..ProductQuery::default()
    };
    let customer_query = CustomerQuery {
        limit: Some(1),
        ..CustomerQuery::default()
    };

    let (orders, appointments, products, customers) = tokio::try_join!(
        backend.list_orders(&ctx, &order_query),
        backend.list_appointments(&ctx, &appointment_query),
        backend.list_products(&ctx, &product_query),
        backend.list_customers(&ctx, &customer_query),
    )?;

    let (orders, order_total) = rows(orders);
    let (appointments, _) = rows(appointments);
    let (products, _) = rows(products);
    let (_, customer_total) = rows(customers);
    let schedule_counts = state.schedules().read().await.status_counts();

    let metrics = summarize(
        DashboardInput {
            orders: &orders,
            appointments: &appointments,
            products: &products,
            order_total,
            customer_total,
            schedule_counts: &schedule_counts,
        },
        Utc::now(),
    );

    tracing::debug!(
        orders = orders.len(),
        order_total,
        revenue = %metrics.revenue,
        "Dashboard computed"
    );
    Ok(Json(ApiResponse::ok(metrics)))
}
