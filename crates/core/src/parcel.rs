//! Parcel derivation from cart contents.
//!
//! Every order goes out in the same base box. Each cookie tin weighs about
//! 0.2 lb, and the box is stacked one layer higher for every six tins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CurrencyCode, DistanceUnit, MassUnit, Price};

/// Weight of a single item, in pounds.
pub const ITEM_WEIGHT_LB: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Items that fit in one layer of the base box.
pub const ITEMS_PER_LAYER: u32 = 6;

/// Base box length, in inches.
pub const BASE_LENGTH_IN: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Base box width, in inches.
pub const BASE_WIDTH_IN: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

/// Height of one layer, in inches.
pub const BASE_HEIGHT_IN: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// One line of the shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product name as shown in the cart.
    pub name: String,
    /// Number of units.
    pub quantity: u32,
    /// Price of one unit.
    pub unit_price: Decimal,
}

/// Cart contents that cannot be priced or packed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("negative unit price for {0}")]
    NegativePrice(String),
    #[error("too many items in cart")]
    TooManyItems,
    #[error("cart total is out of range")]
    AmountOverflow,
}

impl CartLine {
    /// Quantity × unit price.
    ///
    /// # Errors
    ///
    /// Rejects a negative unit price and a product that overflows.
    pub fn line_total(&self) -> Result<Decimal, CartError> {
        if self.unit_price < Decimal::ZERO {
            return Err(CartError::NegativePrice(self.name.clone()));
        }
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(CartError::AmountOverflow)
    }
}

/// Sum of line totals in the given currency.
///
/// # Errors
///
/// Fails if any line is invalid or the sum overflows.
pub fn subtotal(lines: &[CartLine], currency_code: CurrencyCode) -> Result<Price, CartError> {
    let amount = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.line_total()?)
            .ok_or(CartError::AmountOverflow)
    })?;
    Ok(Price::new(amount, currency_code))
}

/// Total number of units across all lines.
///
/// # Errors
///
/// Returns [`CartError::TooManyItems`] if the count does not fit a `u32`.
pub fn item_count(lines: &[CartLine]) -> Result<u32, CartError> {
    lines.iter().try_fold(0u32, |count, line| {
        count
            .checked_add(line.quantity)
            .ok_or(CartError::TooManyItems)
    })
}

/// Check that a cart can be both priced and packed.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_cart(lines: &[CartLine]) -> Result<(), CartError> {
    item_count(lines)?;
    subtotal(lines, CurrencyCode::default())?;
    Ok(())
}

/// Package dimensions and weight sent to the carrier for quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub distance_unit: DistanceUnit,
    pub weight: Decimal,
    pub mass_unit: MassUnit,
}

impl Parcel {
    /// Derive the parcel for a cart.
    ///
    /// An empty cart still yields a single-layer box so the carrier receives a
    /// quotable package.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TooManyItems`] if the item count overflows.
    pub fn for_cart(lines: &[CartLine]) -> Result<Self, CartError> {
        let count = item_count(lines)?;
        let weight = Decimal::from(count) * ITEM_WEIGHT_LB;

        Ok(Self {
            length: BASE_LENGTH_IN,
            width: BASE_WIDTH_IN,
            height: BASE_HEIGHT_IN * Decimal::from(layers(count)),
            distance_unit: DistanceUnit::In,
            weight,
            mass_unit: MassUnit::Lb,
        })
    }
}

/// `ceil(count / 6)`, never less than one.
#[must_use]
pub const fn layers(count: u32) -> u32 {
    let layers = count.div_ceil(ITEMS_PER_LAYER);
    if layers == 0 { 1 } else { layers }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(quantity: u32) -> CartLine {
        CartLine {
            name: "Brown Butter Chocolate Chip".to_string(),
            quantity,
            unit_price: Decimal::new(450, 2),
        }
    }

    #[test]
    fn test_ten_items_weigh_two_pounds() {
        let parcel = Parcel::for_cart(&[line(10)]).unwrap();
        assert_eq!(parcel.weight, Decimal::new(20, 1));
        assert_eq!(parcel.mass_unit, MassUnit::Lb);
    }

    #[test]
    fn test_ten_items_double_the_base_height() {
        let parcel = Parcel::for_cart(&[line(10)]).unwrap();
        assert_eq!(layers(10), 2);
        assert_eq!(parcel.height, BASE_HEIGHT_IN * Decimal::TWO);
        assert_eq!(parcel.length, BASE_LENGTH_IN);
        assert_eq!(parcel.width, BASE_WIDTH_IN);
    }

    #[test]
    fn test_weight_sums_across_lines() {
        let parcel = Parcel::for_cart(&[line(3), line(4)]).unwrap();
        assert_eq!(parcel.weight, Decimal::new(14, 1));
        // 7 items → two layers
        assert_eq!(parcel.height, Decimal::from(8));
    }

    #[test]
    fn test_layer_boundaries() {
        assert_eq!(layers(0), 1);
        assert_eq!(layers(1), 1);
        assert_eq!(layers(6), 1);
        assert_eq!(layers(7), 2);
        assert_eq!(layers(12), 2);
        assert_eq!(layers(13), 3);
    }

    #[test]
    fn test_empty_cart_is_one_empty_layer() {
        let parcel = Parcel::for_cart(&[]).unwrap();
        assert_eq!(parcel.weight, Decimal::ZERO);
        assert_eq!(parcel.height, BASE_HEIGHT_IN);
    }

    #[test]
    fn test_subtotal() {
        let total = subtotal(&[line(2), line(1)], CurrencyCode::USD).unwrap();
        assert_eq!(total.amount, Decimal::new(1350, 2));
        assert_eq!(item_count(&[line(2), line(1)]), Ok(3));
    }

    #[test]
    fn test_item_count_overflow_is_rejected() {
        let lines = [line(u32::MAX), line(1)];

        assert_eq!(item_count(&lines), Err(CartError::TooManyItems));
        assert_eq!(Parcel::for_cart(&lines), Err(CartError::TooManyItems));
        assert_eq!(validate_cart(&lines), Err(CartError::TooManyItems));
    }

    #[test]
    fn test_largest_cart_still_packs() {
        let parcel = Parcel::for_cart(&[line(u32::MAX)]).unwrap();
        assert_eq!(parcel.height, BASE_HEIGHT_IN * Decimal::from(layers(u32::MAX)));
    }

    #[test]
    fn test_subtotal_overflow_is_rejected() {
        let huge = CartLine {
            unit_price: Decimal::MAX,
            ..line(2)
        };
        assert_eq!(huge.line_total(), Err(CartError::AmountOverflow));

        let max = CartLine {
            unit_price: Decimal::MAX,
            ..line(1)
        };
        assert_eq!(
            subtotal(&[max.clone(), max], CurrencyCode::USD),
            Err(CartError::AmountOverflow)
        );
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let refund = CartLine {
            unit_price: Decimal::new(-100, 2),
            ..line(1)
        };
        assert!(matches!(
            validate_cart(&[line(1), refund]),
            Err(CartError::NegativePrice(_))
        ));
        assert!(validate_cart(&[line(0)]).is_ok());
    }
}
