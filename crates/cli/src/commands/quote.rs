//! Rate quote command.
//!
//! # Environment Variables
//!
//! - `SHIPPO_API_TOKEN` - Carrier API token (sample rates without it)
//! - `SHIPPO_API_URL` - Carrier API base URL
//! - `SHIP_FROM_*` - Origin address

use cookie_courier_core::{
    CartError, FlowState, Parcel, RateFlow, ShippingAddress, ShippingWindow, correct_address,
};
use cookie_courier_storefront::config::{ConfigError, ShippoConfig};
use cookie_courier_storefront::services::{QuoteRequest, fetch_rates};
use cookie_courier_storefront::shippo::{ShippoClient, ShippoError};
use thiserror::Error;

use super::parcel::cart_of;

/// Errors that can occur while quoting.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Carrier settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Carrier client could not be built.
    #[error("Carrier client error: {0}")]
    Client(#[from] ShippoError),

    /// The cart cannot be packed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The carrier answered with no rates.
    #[error("No rates available for this destination")]
    NoRates,
}

/// Where the parcel is going.
#[derive(Debug)]
pub struct Destination {
    pub name: String,
    pub street1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl From<Destination> for ShippingAddress {
    fn from(destination: Destination) -> Self {
        Self {
            name: destination.name,
            street1: destination.street1,
            city: destination.city,
            state: destination.state,
            zip: destination.zip,
            country: destination.country,
            is_residential: Some(true),
            ..Default::default()
        }
    }
}

/// Fetch and print rates for a cart of `items` cookies.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the carrier has no rates.
#[allow(clippy::print_stdout)]
pub async fn quote(destination: Destination, items: u32) -> Result<(), QuoteError> {
    dotenvy::dotenv().ok();

    let config = ShippoConfig::from_env()?;
    let client = ShippoClient::new(&config)?;

    let (address_to, notes) = correct_address(destination.into());
    for note in &notes {
        tracing::info!("{note}");
    }

    let request = QuoteRequest {
        address_to,
        parcel: Parcel::for_cart(&cart_of(items))?,
    };

    let mut flow = RateFlow::new();
    let ticket = flow.begin();
    flow.receive(ticket, fetch_rates(&client, &request).await);

    let FlowState::RatesReady { rates, notice, .. } = flow.state() else {
        return Err(QuoteError::NoRates);
    };
    if let Some(notice) = notice {
        println!("({})", notice.message());
    }

    let today = super::today();
    for rate in rates {
        let window = ShippingWindow::compute(today, &rate.provider, &rate.service_level.name);
        println!(
            "{:<8} {:<28} {:>9}  arrives {}  [{}]",
            rate.provider,
            rate.service_level.name,
            rate.price.display(),
            window.estimate(),
            rate.id
        );
    }

    Ok(())
}
