//! Shipping and tax quotes for a cart subtotal.

use rust_decimal::Decimal;
use serde::Serialize;

use clinica_core::cart::{ShippingQuote, TAX_RATE_PERCENT, shipping_quote};
use clinica_core::{Price, round_cents};

use super::CommandError;

/// A quote for a subtotal, with display strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: Decimal,
    #[serde(flatten)]
    pub shipping: ShippingQuote,
    pub tax: Decimal,
    pub total: Decimal,
    pub total_display: String,
}

/// Build the quote for `subtotal`.
///
/// # Errors
///
/// Returns an error for a negative subtotal.
pub fn quote(subtotal: Decimal) -> Result<Quote, CommandError> {
    if subtotal.is_sign_negative() {
        return Err(CommandError::InvalidArgument(
            "subtotal must not be negative".to_string(),
        ));
    }
    let subtotal = round_cents(subtotal);
    let shipping = shipping_quote(subtotal);
    let tax = round_cents(subtotal * TAX_RATE_PERCENT / Decimal::ONE_HUNDRED);
    let total = subtotal + shipping.cost + tax;

    Ok(Quote {
        subtotal,
        shipping,
        tax,
        total,
        total_display: Price::usd(total).display(),
    })
}

/// Render the quote as pretty JSON.
///
/// # Errors
///
/// Returns an error for a negative subtotal.
pub fn render(subtotal: Decimal) -> Result<String, CommandError> {
    Ok(serde_json::to_string_pretty(&quote(subtotal)?)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_quote_below_threshold() {
        let quote = quote(Decimal::from_str("40").unwrap()).unwrap();
        assert_eq!(quote.shipping.cost, Decimal::from(10));
        assert_eq!(quote.tax, Decimal::from_str("3.20").unwrap());
        assert_eq!(quote.total_display, "$53.20");
    }

    #[test]
    fn test_quote_free_shipping() {
        let quote = quote(Decimal::from_str("150").unwrap()).unwrap();
        assert!(quote.shipping.free_shipping);
        assert_eq!(quote.total, Decimal::from(162));
    }

    #[test]
    fn test_negative_subtotal_rejected() {
        assert!(quote(Decimal::from(-1)).is_err());
    }
}
