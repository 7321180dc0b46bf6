//! Business services used by the route handlers.

pub mod catalog;
pub mod payment;

pub use catalog::CatalogService;
pub use payment::{MockPaymentGateway, PaymentError};
