//! Business logic services.
//!
//! - [`rate_quotes`] - Probe-then-quote against the carrier API with fallback
//! - [`checkout_store`] - Per-checkout flow state and purchased labels

pub mod checkout_store;
pub mod rate_quotes;

pub use checkout_store::{CheckoutStore, SharedFlow};
pub use rate_quotes::{QuoteRequest, RateQuoter, fetch_rates};
