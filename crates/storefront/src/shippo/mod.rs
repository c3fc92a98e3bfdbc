//! Shippo carrier API client.
//!
//! Provides access to the REST endpoints the storefront needs:
//! rate quotes (`/shipments`), address validation (`/addresses`) and label
//! purchase (`/transactions`).
//!
//! # Architecture
//!
//! - Token authentication (`Authorization: ShippoToken ...`)
//! - Wire types live in [`types`] and are converted into core types at the edge
//! - The client is optional in practice: without a token every call returns
//!   [`ShippoError::NotConfigured`], which the rate service treats as offline

pub mod client;
pub mod types;

pub use client::ShippoClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Shippo API.
#[derive(Debug, Error)]
pub enum ShippoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No API token configured.
    #[error("Shippo API token not configured")]
    NotConfigured,

    /// Transaction did not produce a label.
    #[error("Label purchase failed: {0}")]
    LabelFailed(String),

    /// Response could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),
}
