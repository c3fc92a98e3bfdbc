//! Core types for Cookie Courier.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod units;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use units::{DistanceUnit, MassUnit};
