//! Parcel derivation command.

use cookie_courier_core::{CartError, CartLine, Parcel};
use rust_decimal::Decimal;

/// A cart holding `items` cookies.
pub fn cart_of(items: u32) -> Vec<CartLine> {
    vec![CartLine {
        name: "Cookie".to_string(),
        quantity: items,
        unit_price: Decimal::ZERO,
    }]
}

/// Print the parcel a cart of `items` cookies ships in.
///
/// # Errors
///
/// Returns an error if the cart cannot be packed.
#[allow(clippy::print_stdout)]
pub fn parcel(items: u32) -> Result<(), CartError> {
    let parcel = Parcel::for_cart(&cart_of(items))?;
    let unit = parcel.distance_unit.as_str();

    println!(
        "Box:    {} x {} x {} {unit}",
        parcel.length, parcel.width, parcel.height
    );
    println!("Weight: {} {}", parcel.weight, parcel.mass_unit.as_str());
    Ok(())
}
