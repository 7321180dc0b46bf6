//! Shopping cart reducer.
//!
//! The cart is an ordered list of line items plus totals that are derived
//! from it. Every mutation goes through [`Cart::dispatch`], which applies a
//! [`CartAction`] and then recomputes the totals, so the totals can never
//! drift from the lines.
//!
//! # Pricing rules
//!
//! - Shipping is free when the subtotal is strictly greater than
//!   [`FREE_SHIPPING_THRESHOLD`], otherwise [`FLAT_SHIPPING_FEE`] applies.
//!   An empty cart is never charged shipping.
//! - Tax is [`TAX_RATE_PERCENT`] of the subtotal, rounded to cents.
//! - `total = subtotal + shipping + tax - discount`
//!
//! ```
//! use clinica_core::cart::{Cart, CartAction, CartItem};
//! use clinica_core::ProductId;
//! use rust_decimal::Decimal;
//!
//! let mut cart = Cart::default();
//! cart.dispatch(CartAction::AddItem(CartItem::new(
//!     ProductId::new("p1"),
//!     "Vitamin D3",
//!     Decimal::new(1250, 2),
//!     2,
//! )));
//! assert_eq!(cart.totals.subtotal, Decimal::new(2500, 2));
//! assert_eq!(cart.totals.shipping, Decimal::new(1000, 2));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, round_cents};

/// Subtotal above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Flat shipping fee charged at or below the threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Tax rate applied to the subtotal, in percent.
pub const TAX_RATE_PERCENT: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// One product entry in the cart with its quantity and price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the product was added.
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartItem {
    /// Create a line item without an image.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            image_url: None,
        }
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image(mut self, url: Option<String>) -> Self {
        self.image_url = url;
        self
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Totals derived from the cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartTotals {
    /// Compute totals for a set of lines and a discount.
    #[must_use]
    pub fn compute(items: &[CartItem], discount: Decimal) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let subtotal = round_cents(items.iter().map(CartItem::line_total).sum());
        let shipping = shipping_quote(subtotal).cost;
        let tax = round_cents(subtotal * TAX_RATE_PERCENT / Decimal::ONE_HUNDRED);
        let item_count = items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity));

        Self {
            subtotal,
            shipping,
            tax,
            discount,
            total: subtotal + shipping + tax - discount,
            item_count,
        }
    }
}

/// Shipping cost for a given subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub cost: Decimal,
    pub free_shipping: bool,
    /// How much more must be spent before shipping becomes free.
    pub amount_until_free: Decimal,
}

/// Quote shipping for a subtotal.
///
/// A zero subtotal means there is nothing to ship and costs nothing.
#[must_use]
pub fn shipping_quote(subtotal: Decimal) -> ShippingQuote {
    if subtotal <= Decimal::ZERO {
        return ShippingQuote {
            cost: Decimal::ZERO,
            free_shipping: false,
            amount_until_free: FREE_SHIPPING_THRESHOLD,
        };
    }

    if subtotal > FREE_SHIPPING_THRESHOLD {
        ShippingQuote {
            cost: Decimal::ZERO,
            free_shipping: true,
            amount_until_free: Decimal::ZERO,
        }
    } else {
        ShippingQuote {
            cost: FLAT_SHIPPING_FEE,
            free_shipping: false,
            amount_until_free: FREE_SHIPPING_THRESHOLD - subtotal,
        }
    }
}

/// A mutation of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    /// Add a line, merging with an existing line for the same product.
    AddItem(CartItem),
    /// Remove the line for a product.
    RemoveItem { product_id: ProductId },
    /// Set the quantity of a line; zero removes it.
    UpdateQuantity { product_id: ProductId, quantity: u32 },
    /// Reduce the quantity of a line by one; reaching zero removes it.
    DecrementItem { product_id: ProductId },
    /// Record a coupon code. No discount source exists, so the discount is unchanged.
    ApplyCoupon { code: String },
    /// Remove every line and reset all totals.
    Clear,
}

/// The shopping cart for one visitor session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub totals: CartTotals,
}

impl Cart {
    /// Apply an action and recompute the totals.
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem(item) => self.add(item),
            CartAction::RemoveItem { product_id } => {
                self.items.retain(|line| line.product_id != product_id);
            }
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => self.set_quantity(&product_id, quantity),
            CartAction::DecrementItem { product_id } => {
                if let Some(current) = self.quantity_of(&product_id) {
                    self.set_quantity(&product_id, current.saturating_sub(1));
                }
            }
            CartAction::ApplyCoupon { code } => {
                let code = code.trim().to_uppercase();
                self.coupon_code = (!code.is_empty()).then_some(code);
            }
            CartAction::Clear => {
                self.items.clear();
                self.coupon_code = None;
            }
        }

        self.recompute();
    }

    /// Consuming form of [`Cart::dispatch`].
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        self.dispatch(action);
        self
    }

    /// Quantity of a product currently in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|line| &line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            line.quantity = line.quantity.saturating_add(item.quantity);
            line.name = item.name;
            line.unit_price = item.unit_price;
            if item.image_url.is_some() {
                line.image_url = item.image_url;
            }
        } else {
            self.items.push(item);
        }
    }

    fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.items.retain(|line| &line.product_id != product_id);
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    fn recompute(&mut self) {
        // No discount source exists yet; coupons are recorded only.
        self.totals = CartTotals::compute(&self.items, Decimal::ZERO);
    }
}
