//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Carrier API reachability
//!
//! # Shipping
//! GET  /api/shipping/window    - Shipment date and delivery window preview
//! POST /api/shipping/rates     - Fetch rates for an address and cart
//! GET  /api/shipping/flow      - Current rate flow state
//! POST /api/shipping/select    - Select a rate
//! POST /api/shipping/confirm   - Confirm the selected rate
//! POST /api/shipping/cancel    - Abandon the rate flow
//! POST /api/shipping/label     - Buy a label for the confirmed rate
//! GET  /api/shipping/label     - Last label bought for this checkout
//!
//! # Address
//! POST /api/address/validate   - Correct and validate an address
//!
//! # Checkout
//! POST /api/checkout/summary   - Payment handoff for the confirmed rate
//! ```

pub mod address;
pub mod checkout;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the shipping routes router.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/window", get(shipping::window))
        .route("/rates", post(shipping::rates))
        .route("/flow", get(shipping::show))
        .route("/select", post(shipping::select))
        .route("/confirm", post(shipping::confirm))
        .route("/cancel", post(shipping::cancel))
        .route(
            "/label",
            get(shipping::show_label).post(shipping::purchase_label),
        )
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new().route("/validate", post(address::validate))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/summary", post(checkout::summary))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/shipping", shipping_routes())
        .nest("/api/address", address_routes())
        .nest("/api/checkout", checkout_routes())
}
