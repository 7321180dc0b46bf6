//! Client for the Clinica REST backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth; the web services never store
//!   orders, products, customers or appointments locally
//! - Every outbound request carries the caller's bearer token and tenant id
//!   taken from the `auth_token` and `client_id` cookies
//! - Successful JSON bodies are wrapped in [`ApiResponse`] envelopes; non-2xx
//!   statuses become [`BackendError::Status`] carrying the body text
//!
//! # Example
//!
//! ```rust,ignore
//! use clinica_backend::{BackendClient, BackendConfig, RequestContext};
//!
//! let config = BackendConfig::from_env()?;
//! let client = BackendClient::new(&config)?;
//! let ctx = RequestContext::anonymous().with_default_client(config.default_client_id.as_ref());
//!
//! let page = client.list_products(&ctx, &ProductQuery::default()).await?;
//! ```

mod client;
pub mod config;
mod context;
mod error;

pub mod appointments;
pub mod customers;
pub mod ecommerce;
pub mod orders;
pub mod products;

pub use client::BackendClient;
pub use config::{BackendConfig, ConfigError};
pub use context::{AUTH_TOKEN_COOKIE, CLIENT_ID_COOKIE, CLIENT_ID_HEADER, RequestContext};
pub use error::{BackendError, InputError};

pub use clinica_core::{ApiResponse, ErrorCategory, Paginated};
