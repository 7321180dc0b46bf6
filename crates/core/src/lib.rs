//! Clinica Core - Shared domain types and state containers.
//!
//! This crate provides the types used across all Clinica components:
//! - `backend` - Proxy client for the external REST API
//! - `storefront` - Public catalog, cart, checkout and booking service
//! - `admin` - Clinic and store management service
//! - `cli` - Fixture generation and operator tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients. Anything that lives in a visitor's session (cart,
//! notifications, theme, favorites, mock schedules) is modelled here as a
//! plain serializable value so the web services can persist it however
//! they like.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, emails and statuses
//! - [`cart`] - Shopping cart reducer with derived totals
//! - [`schedule`] - Schedule records, the in-memory schedule book and the mock generator
//! - [`envelope`] - The `{success, data, message}` response envelope
//! - [`error_kind`] - Heuristic error classification for user-facing messages
//! - [`notifications`] - Notification centre reducer
//! - [`preferences`] - Theme and favorites

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod envelope;
pub mod error_kind;
pub mod notifications;
pub mod preferences;
pub mod schedule;
pub mod types;

pub use envelope::{ApiResponse, ListPayload, Paginated};
pub use error_kind::ErrorCategory;
pub use types::*;
