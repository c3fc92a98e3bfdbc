//! Cookie Courier Core - Shipping rules library.
//!
//! This crate provides the deterministic shipping logic used by the
//! Cookie Courier components:
//! - `storefront` - Backend that proxies the carrier rate API
//! - `cli` - Command-line tools for schedules, windows and quotes
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clock reads. "Today" is always passed in by the caller.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and units
//! - [`window`] - Shipment date and delivery window calculator
//! - [`parcel`] - Parcel derivation from cart contents
//! - [`address`] - Shipping address and the known-correction rules
//! - [`rate`] - Carrier rate quotes and the sample fallback set
//! - [`flow`] - Rate selection state machine
//! - [`selection`] - Confirmed shipping selection and label records
//! - [`checkout`] - Payload handed to the payment collaborator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod checkout;
pub mod flow;
pub mod parcel;
pub mod rate;
pub mod selection;
pub mod types;
pub mod window;

pub use address::{AddressValidation, ShippingAddress, correct_address};
pub use checkout::{CheckoutHandoff, CustomerInfo};
pub use flow::{
    Choice, FailureReason, FetchOutcome, FlowError, FlowState, RateFlow, RateNotice, Receipt, Ticket,
};
pub use parcel::{CartError, CartLine, Parcel, validate_cart};
pub use rate::{ServiceLevel, ShippingRate, sample_rates};
pub use selection::{LabelError, LabelRecord, LabelStatus, ShippingSelection};
pub use types::*;
pub use window::{DeliveryEstimate, ShippingWindow, TransitDays};
