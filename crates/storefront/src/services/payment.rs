//! Stand-in payment gateway.
//!
//! No real processor is integrated. Every charge for a positive amount
//! succeeds immediately with a generated reference, which keeps checkout
//! exercisable end to end.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use clinica_backend::ecommerce::PaymentRecord;
use clinica_core::PaymentStatus;

/// Payment methods the checkout form offers.
pub const SUPPORTED_METHODS: &[&str] = &["card", "cash", "transfer"];

/// Errors raised by the payment gateway.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Unsupported payment method: {0}")]
    UnsupportedMethod(String),
    #[error("Payment amount must be positive")]
    NonPositiveAmount,
}

/// Always-approving payment gateway.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway;

impl MockPaymentGateway {
    /// Charge `amount` using `method`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` for unknown methods or non-positive amounts.
    pub fn charge(&self, method: &str, amount: Decimal) -> Result<PaymentRecord, PaymentError> {
        let method = method.trim().to_ascii_lowercase();
        if !SUPPORTED_METHODS.contains(&method.as_str()) {
            return Err(PaymentError::UnsupportedMethod(method));
        }
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        let reference = format!("mock_{}", Uuid::new_v4().simple());
        tracing::info!(%reference, %amount, %method, "Mock payment approved");

        Ok(PaymentRecord {
            method,
            reference,
            status: PaymentStatus::Paid,
            amount,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_approves() {
        let record = MockPaymentGateway
            .charge(" Card ", Decimal::new(1999, 2))
            .unwrap();
        assert_eq!(record.method, "card");
        assert_eq!(record.status, PaymentStatus::Paid);
        assert!(record.reference.starts_with("mock_"));
    }

    #[test]
    fn test_charge_rejects() {
        assert_eq!(
            MockPaymentGateway.charge("bitcoin", Decimal::ONE),
            Err(PaymentError::UnsupportedMethod("bitcoin".to_string()))
        );
        assert_eq!(
            MockPaymentGateway.charge("card", Decimal::ZERO),
            Err(PaymentError::NonPositiveAmount)
        );
    }
}
