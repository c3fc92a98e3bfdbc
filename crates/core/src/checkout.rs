//! Payload handed to the payment collaborator.
//!
//! Nothing is charged here. The handoff fixes the amounts the payment step
//! must collect: the cart subtotal plus the confirmed shipping cost.

use serde::{Deserialize, Serialize};

use crate::parcel::{CartError, CartLine, subtotal};
use crate::selection::ShippingSelection;
use crate::types::Price;

/// Who is paying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Everything the payment step needs for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutHandoff {
    pub items: Vec<CartLine>,
    pub subtotal: Price,
    pub shipping_cost: Price,
    pub total: Price,
    pub customer: CustomerInfo,
    pub selection: ShippingSelection,
}

impl CheckoutHandoff {
    /// Total the cart in the shipping rate's currency and add shipping.
    ///
    /// # Errors
    ///
    /// Fails if a cart line is invalid or the total is out of range.
    pub fn new(
        items: Vec<CartLine>,
        customer: CustomerInfo,
        selection: ShippingSelection,
    ) -> Result<Self, CartError> {
        let shipping_cost = selection.cost;
        let subtotal = subtotal(&items, shipping_cost.currency_code)?;
        let total = subtotal
            .checked_add(shipping_cost)
            .ok_or(CartError::AmountOverflow)?;

        Ok(Self {
            items,
            subtotal,
            shipping_cost,
            total,
            customer,
            selection,
        })
    }
}
