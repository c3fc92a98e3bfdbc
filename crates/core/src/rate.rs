//! Carrier rate quotes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price, RateId};

/// A carrier's named service tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLevel {
    /// Display name, e.g. "Ground Advantage".
    pub name: String,
    /// Machine token, e.g. "usps_ground_advantage".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// One priced shipping option for an address/parcel pair.
///
/// Rates are external data and are never modified after they are received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub id: RateId,
    /// Carrier name, e.g. "USPS".
    pub provider: String,
    pub service_level: ServiceLevel,
    pub price: Price,
    /// Carrier's transit-time hint in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
}

impl ShippingRate {
    /// Whether this is one of the offline sample rates.
    #[must_use]
    pub fn is_sample(&self) -> bool {
        self.id.is_sample()
    }
}

/// The fixed rate set used when the carrier API cannot be reached.
#[must_use]
pub fn sample_rates() -> Vec<ShippingRate> {
    [
        ("sample_usps_ground", "USPS", "Ground", 1250, 5),
        ("sample_fedex_ground", "FedEx", "Ground", 1575, 3),
        ("sample_ups_ground", "UPS", "Ground", 1425, 4),
    ]
    .into_iter()
    .map(|(id, provider, service, cents, days)| ShippingRate {
        id: RateId::new(id),
        provider: provider.to_string(),
        service_level: ServiceLevel {
            name: service.to_string(),
            token: None,
        },
        price: Price::new(Decimal::new(cents, 2), CurrencyCode::USD),
        estimated_days: Some(days),
    })
    .collect()
}
