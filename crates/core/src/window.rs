//! Shipment date and delivery window calculator.
//!
//! Cookies are baked to order and always leave the kitchen on a Monday. Given
//! the day a shopper checks out, [`shipment_date`] picks the Monday the order
//! ships on, [`transit_days`] looks up how long the chosen carrier service
//! takes, and [`delivery_window`] turns both into calendar dates.
//!
//! Every function here is total and pure: "today" is an argument, never a
//! clock read, and unrecognised carrier strings fall back to a default range.

use core::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Days from `today` to the shipment Monday, keyed by the weekday of `today`.
///
/// Monday through Thursday ship on the very next Monday. Friday and Saturday
/// skip the immediately following Monday.
///
/// Sunday also skips the immediately following Monday and ships eight days
/// out. This is an intentional rule whose reason is not recorded; keep it as
/// is rather than shipping Sunday orders the next day.
#[must_use]
pub const fn shipment_offset(weekday: Weekday) -> u64 {
    match weekday {
        Weekday::Sun => 8,
        Weekday::Mon => 7,
        Weekday::Tue => 6,
        Weekday::Wed => 5,
        Weekday::Thu => 4,
        Weekday::Fri => 10,
        Weekday::Sat => 9,
    }
}

/// The Monday an order placed on `today` ships on.
///
/// Always strictly after `today` and always a Monday.
#[must_use]
pub fn shipment_date(today: NaiveDate) -> NaiveDate {
    add_days(today, shipment_offset(today.weekday()))
}

/// Calendar-day transit range for a carrier service.
///
/// Always ordered: `min() <= max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransitDays {
    min: u32,
    max: u32,
}

impl TransitDays {
    /// Range used when no carrier rule matches.
    pub const DEFAULT: Self = Self::new(2, 3);

    /// Create a range from its two bounds, in either order.
    #[must_use]
    pub const fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Fewest days in transit.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Most days in transit.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

impl Default for TransitDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One row of the transit table.
struct TransitRule {
    /// Lower-cased carrier name, compared for equality.
    carrier: &'static str,
    /// Lower-cased fragments; any one appearing in the service level matches.
    service_contains: &'static [&'static str],
    days: TransitDays,
}

/// Carrier × service-level transit table. First matching row wins.
const TRANSIT_RULES: &[TransitRule] = &[
    TransitRule {
        carrier: "usps",
        service_contains: &["ground", "standard"],
        days: TransitDays::new(2, 3),
    },
    TransitRule {
        carrier: "usps",
        service_contains: &["priority"],
        days: TransitDays::new(1, 2),
    },
    TransitRule {
        carrier: "usps",
        service_contains: &["express"],
        days: TransitDays::new(1, 1),
    },
    TransitRule {
        carrier: "ups",
        service_contains: &["ground"],
        days: TransitDays::new(1, 5),
    },
    TransitRule {
        carrier: "ups",
        service_contains: &["standard"],
        days: TransitDays::new(1, 3),
    },
    TransitRule {
        carrier: "fedex",
        service_contains: &["ground"],
        days: TransitDays::new(1, 5),
    },
    TransitRule {
        carrier: "fedex",
        service_contains: &["standard"],
        days: TransitDays::new(1, 3),
    },
];

/// Transit range for a carrier and service level.
///
/// The carrier is matched case-insensitively after trimming; the service
/// level is matched by case-insensitive substring. Anything unmatched gets
/// [`TransitDays::DEFAULT`].
#[must_use]
pub fn transit_days(carrier: &str, service_level: &str) -> TransitDays {
    let carrier = carrier.trim().to_lowercase();
    let service = service_level.to_lowercase();

    TRANSIT_RULES
        .iter()
        .find(|rule| {
            rule.carrier == carrier
                && rule
                    .service_contains
                    .iter()
                    .any(|fragment| service.contains(fragment))
        })
        .map_or(TransitDays::DEFAULT, |rule| rule.days)
}

/// Earliest and latest delivery dates for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub min_delivery_date: NaiveDate,
    pub max_delivery_date: NaiveDate,
}

/// Add the transit range to the shipment date (calendar days).
#[must_use]
pub fn delivery_window(shipment_date: NaiveDate, transit: TransitDays) -> DeliveryWindow {
    let min = add_days(shipment_date, u64::from(transit.min()));
    let max = add_days(shipment_date, u64::from(transit.max()));
    DeliveryWindow {
        min_delivery_date: min,
        max_delivery_date: max,
    }
}

/// Shipment date plus delivery range for one chosen rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShippingWindow {
    pub shipment_date: NaiveDate,
    pub min_delivery_date: NaiveDate,
    pub max_delivery_date: NaiveDate,
    pub min_transit_days: u32,
    pub max_transit_days: u32,
}

impl ShippingWindow {
    /// Compute the window for an order placed `today` with the given service.
    #[must_use]
    pub fn compute(today: NaiveDate, carrier: &str, service_level: &str) -> Self {
        let shipment_date = shipment_date(today);
        let transit = transit_days(carrier, service_level);
        let window = delivery_window(shipment_date, transit);

        Self {
            shipment_date,
            min_delivery_date: window.min_delivery_date,
            max_delivery_date: window.max_delivery_date,
            min_transit_days: transit.min(),
            max_transit_days: transit.max(),
        }
    }

    /// What to show the shopper: one date or a range.
    #[must_use]
    pub fn estimate(&self) -> DeliveryEstimate {
        if self.min_delivery_date == self.max_delivery_date {
            DeliveryEstimate::Single {
                date: self.min_delivery_date,
            }
        } else {
            DeliveryEstimate::Range {
                earliest: self.min_delivery_date,
                latest: self.max_delivery_date,
            }
        }
    }
}

/// Delivery estimate as presented to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryEstimate {
    Single {
        date: NaiveDate,
    },
    Range {
        earliest: NaiveDate,
        latest: NaiveDate,
    },
}

impl fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single { date } => write!(f, "{}", date.format("%a, %b %-d")),
            Self::Range { earliest, latest } => write!(
                f,
                "{} - {}",
                earliest.format("%a, %b %-d"),
                latest.format("%a, %b %-d")
            ),
        }
    }
}

/// Calendar addition. Saturates at `NaiveDate::MAX` instead of overflowing.
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}
