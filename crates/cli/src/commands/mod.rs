//! CLI subcommands.

pub mod parcel;
pub mod quote;
pub mod window;

use chrono::NaiveDate;

/// The local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
