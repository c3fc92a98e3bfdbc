//! Shipping window commands.
//!
//! # Usage
//!
//! ```bash
//! # Window for a Friday order shipped UPS Ground
//! courier-cli window --today 2026-10-16 --carrier UPS --service "UPS Ground"
//!
//! # Which day each order ships
//! courier-cli schedule --from 2026-10-12 --days 14
//! ```

use chrono::NaiveDate;
use cookie_courier_core::ShippingWindow;
use cookie_courier_core::window::shipment_date;

/// Print the window for an order placed on `today`.
#[allow(clippy::print_stdout)]
pub fn window(today: NaiveDate, carrier: &str, service: &str) {
    let window = ShippingWindow::compute(today, carrier, service);

    println!("Order date:     {}", today.format("%a, %b %-d %Y"));
    println!(
        "Ships:          {}",
        window.shipment_date.format("%a, %b %-d %Y")
    );
    println!(
        "Transit:        {}-{} days",
        window.min_transit_days, window.max_transit_days
    );
    println!("Arrives:        {}", window.estimate());
}

/// Print the shipment date for `days` consecutive order dates from `from`.
#[allow(clippy::print_stdout)]
pub fn schedule(from: NaiveDate, days: u32) {
    for (order, ships) in schedule_rows(from, days) {
        println!(
            "{}  ->  {}",
            order.format("%a %Y-%m-%d"),
            ships.format("%a %Y-%m-%d")
        );
    }
}

fn schedule_rows(from: NaiveDate, days: u32) -> Vec<(NaiveDate, NaiveDate)> {
    from.iter_days()
        .take(days as usize)
        .map(|order| (order, shipment_date(order)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Weekday};

    use super::*;

    #[test]
    fn test_schedule_ships_every_order_on_a_monday() {
        let from = NaiveDate::from_ymd_opt(2026, 10, 11);
        let rows = from.map(|from| schedule_rows(from, 14)).unwrap_or_default();

        assert_eq!(rows.len(), 14);
        assert!(rows.iter().all(|(_, ships)| ships.weekday() == Weekday::Mon));
        assert!(rows.iter().all(|(order, ships)| ships > order));
    }

    #[test]
    fn test_schedule_of_zero_days_is_empty() {
        let from = NaiveDate::from_ymd_opt(2026, 10, 11);
        assert!(from.map(|from| schedule_rows(from, 0)).unwrap_or_default().is_empty());
    }
}
