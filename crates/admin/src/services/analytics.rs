//! Dashboard analytics.
//!
//! A pure summary over data already fetched from the backend. The route
//! handler does the I/O; everything here is deterministic for a given
//! input and `now`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clinica_backend::appointments::Appointment;
use clinica_backend::orders::Order;
use clinica_backend::products::Product;
use clinica_core::schedule::StatusCount;
use clinica_core::{
    AppointmentStatus, Badge, OrderId, OrderStatus, Price, ProductId, round_cents,
};

/// Products with fewer units than this are reported as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Number of recent orders shown.
pub const RECENT_ORDER_LIMIT: usize = 5;

/// Number of upcoming appointments shown.
pub const UPCOMING_APPOINTMENT_LIMIT: usize = 5;

/// Data the dashboard is computed from.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub orders: &'a [Order],
    pub appointments: &'a [Appointment],
    pub products: &'a [Product],
    /// Total orders as reported by the backend listing; `orders` may be a
    /// single page of them.
    pub order_total: u64,
    /// Total customers as reported by the backend listing.
    pub customer_total: u64,
    pub schedule_counts: &'a [StatusCount],
}

/// Headline numbers and lists for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub revenue: Decimal,
    pub revenue_display: String,
    /// Orders known to the backend.
    pub order_count: u64,
    /// Orders the revenue, average and status counts were computed over.
    pub sampled_orders: usize,
    pub average_order_value: Decimal,
    pub average_order_display: String,
    pub orders_by_status: Vec<OrderStatusCount>,
    pub customer_count: u64,
    pub pending_appointments: usize,
    pub upcoming_appointments: Vec<Appointment>,
    pub low_stock: Vec<LowStockView>,
    pub recent_orders: Vec<RecentOrderView>,
    pub schedule_counts: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockView {
    pub id: ProductId,
    pub name: String,
    pub stock: i64,
}

/// Recent order view for dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrderView {
    pub id: OrderId,
    pub number: String,
    pub customer_name: String,
    pub total: String,
    pub status: OrderStatus,
    pub badge: Badge,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for RecentOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            number: order.reference().to_string(),
            customer_name: customer_name(order),
            total: Price::usd(order.total).display(),
            status: order.status,
            badge: Badge::of(&order.status),
            created_at: order.created_at,
        }
    }
}

/// Customer name, falling back to the email, then "Guest".
fn customer_name(order: &Order) -> String {
    order
        .customer
        .as_ref()
        .and_then(|c| {
            let name = c.name.trim();
            if name.is_empty() {
                Some(c.email.trim()).filter(|e| !e.is_empty())
            } else {
                Some(name)
            }
        })
        .unwrap_or("Guest")
        .to_string()
}

/// Compute the dashboard from fetched data.
///
/// Revenue counts every order except cancelled and refunded ones; the
/// average is taken over those same orders. Both cover the fetched orders
/// only, while `order_count` is the backend's total.
#[must_use]
pub fn summarize(input: DashboardInput<'_>, now: DateTime<Utc>) -> DashboardMetrics {
    let revenue_orders: Vec<&Order> = input
        .orders
        .iter()
        .filter(|o| o.status.counts_as_revenue())
        .collect();
    let revenue = round_cents(revenue_orders.iter().map(|o| o.total).sum());
    let average_order_value = if revenue_orders.is_empty() {
        Decimal::ZERO
    } else {
        round_cents(revenue / Decimal::from(revenue_orders.len()))
    };

    let orders_by_status = OrderStatus::ALL
        .iter()
        .map(|&status| OrderStatusCount {
            status,
            count: input.orders.iter().filter(|o| o.status == status).count(),
        })
        .collect();

    let pending_appointments = input
        .appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled)
        .count();
    let mut upcoming_appointments: Vec<Appointment> = input
        .appointments
        .iter()
        .filter(|a| a.is_upcoming(now))
        .cloned()
        .collect();
    upcoming_appointments.sort_by_key(|a| a.scheduled_at);
    upcoming_appointments.truncate(UPCOMING_APPOINTMENT_LIMIT);

    let mut low_stock: Vec<LowStockView> = input
        .products
        .iter()
        .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
        .map(|p| LowStockView {
            id: p.id.clone(),
            name: p.name.clone(),
            stock: p.stock,
        })
        .collect();
    low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));

    let mut recent: Vec<&Order> = input.orders.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_orders = recent
        .into_iter()
        .take(RECENT_ORDER_LIMIT)
        .map(RecentOrderView::from)
        .collect();

    DashboardMetrics {
        revenue_display: Price::usd(revenue).display(),
        revenue,
        order_count: input.order_total,
        sampled_orders: input.orders.len(),
        average_order_display: Price::usd(average_order_value).display(),
        average_order_value,
        orders_by_status,
        customer_count: input.customer_total,
        pending_appointments,
        upcoming_appointments,
        low_stock,
        recent_orders,
        schedule_counts: input.schedule_counts.to_vec(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use clinica_backend::orders::OrderCustomer;
    use clinica_core::AppointmentId;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn order(id: &str, total: i64, status: OrderStatus, age_days: i64) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "items": [],
            "subtotal": "0",
            "total": Decimal::new(total, 2).to_string(),
            "status": status.as_str(),
            "createdAt": now() - Duration::days(age_days),
        }))
        .unwrap()
    }

    fn appointment(id: &str, status: AppointmentStatus, in_hours: i64) -> Appointment {
        Appointment {
            id: AppointmentId::new(id),
            customer_name: "Pat".to_string(),
            email: None,
            phone: None,
            service: "Check-up".to_string(),
            practitioner: None,
            scheduled_at: now() + Duration::hours(in_hours),
            duration_minutes: 30,
            status,
            notes: None,
            created_at: None,
        }
    }

    fn product(id: &str, stock: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "price": "10.00",
            "stock": stock,
            "isActive": true,
        }))
        .unwrap()
    }

    fn empty_summary(orders: &[Order]) -> DashboardMetrics {
        summarize(
            DashboardInput {
                orders,
                appointments: &[],
                products: &[],
                order_total: orders.len() as u64,
                customer_total: 0,
                schedule_counts: &[],
            },
            now(),
        )
    }

    #[test]
    fn test_revenue_excludes_cancelled_and_refunded() {
        let orders = vec![
            order("a", 10_000, OrderStatus::Delivered, 1),
            order("b", 5_050, OrderStatus::Pending, 2),
            order("c", 99_999, OrderStatus::Cancelled, 3),
            order("d", 20_000, OrderStatus::Refunded, 4),
        ];
        let metrics = empty_summary(&orders);

        assert_eq!(metrics.revenue, Decimal::new(15_050, 2));
        assert_eq!(metrics.revenue_display, "$150.50");
        assert_eq!(metrics.order_count, 4);
        assert_eq!(metrics.sampled_orders, 4);
        assert_eq!(metrics.average_order_value, Decimal::new(7_525, 2));

        let cancelled = metrics
            .orders_by_status
            .iter()
            .find(|c| c.status == OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled.count, 1);
        assert_eq!(metrics.orders_by_status.len(), OrderStatus::ALL.len());
    }

    #[test]
    fn test_order_count_comes_from_backend_total() {
        let orders = vec![
            order("a", 4_000, OrderStatus::Delivered, 1),
            order("b", 2_000, OrderStatus::Pending, 2),
        ];
        let metrics = summarize(
            DashboardInput {
                orders: &orders,
                appointments: &[],
                products: &[],
                order_total: 250,
                customer_total: 0,
                schedule_counts: &[],
            },
            now(),
        );
        assert_eq!(metrics.order_count, 250);
        assert_eq!(metrics.sampled_orders, 2);
        assert_eq!(metrics.revenue, Decimal::new(6_000, 2));
    }

    #[test]
    fn test_no_orders_means_zero_average() {
        let metrics = empty_summary(&[]);
        assert_eq!(metrics.revenue, Decimal::ZERO);
        assert_eq!(metrics.average_order_value, Decimal::ZERO);
        assert_eq!(metrics.average_order_display, "$0.00");
        assert!(metrics.recent_orders.is_empty());
    }

    #[test]
    fn test_recent_orders_newest_first_and_capped() {
        let orders: Vec<Order> = (0..8)
            .map(|i| order(&format!("o{i}"), 1_000, OrderStatus::Processing, i))
            .collect();
        let metrics = empty_summary(&orders);

        assert_eq!(metrics.recent_orders.len(), RECENT_ORDER_LIMIT);
        assert_eq!(metrics.recent_orders[0].id, OrderId::new("o0"));
        assert_eq!(metrics.recent_orders[0].customer_name, "Guest");
        assert_eq!(metrics.recent_orders[0].badge.label, "Processing");
    }

    #[test]
    fn test_customer_name_fallbacks() {
        let mut named = order("a", 100, OrderStatus::Pending, 0);
        named.customer = Some(OrderCustomer {
            id: None,
            name: "Jo Smith".to_string(),
            email: "jo@x.test".to_string(),
        });
        assert_eq!(customer_name(&named), "Jo Smith");

        named.customer = Some(OrderCustomer {
            id: None,
            name: " ".to_string(),
            email: "jo@x.test".to_string(),
        });
        assert_eq!(customer_name(&named), "jo@x.test");
    }

    #[test]
    fn test_appointments_and_stock() {
        let appointments = vec![
            appointment("late", AppointmentStatus::Confirmed, 48),
            appointment("soon", AppointmentStatus::Scheduled, 2),
            appointment("past", AppointmentStatus::Scheduled, -5),
            appointment("closed", AppointmentStatus::Cancelled, 10),
        ];
        let products = vec![product("p1", 3), product("p2", 50), product("p3", 0)];
        let metrics = summarize(
            DashboardInput {
                orders: &[],
                appointments: &appointments,
                products: &products,
                order_total: 0,
                customer_total: 42,
                schedule_counts: &[],
            },
            now(),
        );

        assert_eq!(metrics.pending_appointments, 2);
        let upcoming: Vec<&str> = metrics
            .upcoming_appointments
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(upcoming, ["soon", "late"]);

        let low: Vec<i64> = metrics.low_stock.iter().map(|p| p.stock).collect();
        assert_eq!(low, [0, 3]);
        assert_eq!(metrics.customer_count, 42);
    }
}
