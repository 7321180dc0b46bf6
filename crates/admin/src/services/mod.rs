//! Business logic services for admin.
//!
//! # Services
//!
//! - `analytics` - Dashboard metrics computed from backend data

pub mod analytics;

pub use analytics::{DashboardInput, DashboardMetrics, summarize};
