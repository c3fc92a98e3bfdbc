//! Shippo wire types and conversions into core types.

use std::str::FromStr;

use cookie_courier_core::{
    AddressValidation, CurrencyCode, LabelRecord, Parcel, Price, RateId, ServiceLevel,
    ShippingAddress, ShippingRate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShippoError;

// =============================================================================
// Requests
// =============================================================================

/// Address as sent to Shippo.
#[derive(Debug, Serialize)]
pub struct AddressPayload<'a> {
    pub name: &'a str,
    pub street1: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<&'a str>,
    pub city: &'a str,
    pub state: &'a str,
    pub zip: &'a str,
    pub country: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_residential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,
}

impl<'a> From<&'a ShippingAddress> for AddressPayload<'a> {
    fn from(address: &'a ShippingAddress) -> Self {
        Self {
            name: &address.name,
            street1: &address.street1,
            street2: address.street2.as_deref(),
            city: &address.city,
            state: &address.state,
            zip: &address.zip,
            country: &address.country,
            phone: &address.phone,
            email: &address.email,
            is_residential: address.is_residential,
            validate: None,
        }
    }
}

/// Parcel as sent to Shippo. Dimensions travel as decimal strings.
#[derive(Debug, Serialize)]
pub struct ParcelPayload {
    pub length: String,
    pub width: String,
    pub height: String,
    pub distance_unit: cookie_courier_core::DistanceUnit,
    pub weight: String,
    pub mass_unit: cookie_courier_core::MassUnit,
}

impl From<&Parcel> for ParcelPayload {
    fn from(parcel: &Parcel) -> Self {
        Self {
            length: parcel.length.normalize().to_string(),
            width: parcel.width.normalize().to_string(),
            height: parcel.height.normalize().to_string(),
            distance_unit: parcel.distance_unit,
            weight: parcel.weight.normalize().to_string(),
            mass_unit: parcel.mass_unit,
        }
    }
}

/// `POST /shipments/` body.
#[derive(Debug, Serialize)]
pub struct ShipmentRequest<'a> {
    pub address_from: AddressPayload<'a>,
    pub address_to: AddressPayload<'a>,
    pub parcels: Vec<ParcelPayload>,
    #[serde(rename = "async")]
    pub run_async: bool,
}

/// `POST /transactions/` body.
#[derive(Debug, Serialize)]
pub struct TransactionRequest<'a> {
    pub rate: &'a str,
    pub label_file_type: &'static str,
    #[serde(rename = "async")]
    pub run_async: bool,
}

// =============================================================================
// Responses
// =============================================================================

/// A message attached to a Shippo object.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// `POST /shipments/` response.
#[derive(Debug, Deserialize)]
pub struct ShipmentResponse {
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rates: Vec<RateResponse>,
    #[serde(default)]
    pub messages: Vec<MessageResponse>,
}

/// One rate in a shipment response.
#[derive(Debug, Clone, Deserialize)]
pub struct RateResponse {
    pub object_id: String,
    pub provider: String,
    pub servicelevel: ServiceLevelResponse,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub estimated_days: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceLevelResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl TryFrom<RateResponse> for ShippingRate {
    type Error = ShippoError;

    fn try_from(rate: RateResponse) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(rate.amount.trim()).map_err(|e| {
            ShippoError::Parse(format!("rate {} amount '{}': {e}", rate.object_id, rate.amount))
        })?;
        let currency = CurrencyCode::from_code(&rate.currency).ok_or_else(|| {
            ShippoError::Parse(format!(
                "rate {} has unsupported currency '{}'",
                rate.object_id, rate.currency
            ))
        })?;

        Ok(Self {
            id: RateId::new(rate.object_id),
            provider: rate.provider,
            service_level: ServiceLevel {
                name: rate.servicelevel.name,
                token: rate.servicelevel.token,
            },
            price: Price::new(amount, currency),
            estimated_days: rate.estimated_days,
        })
    }
}

/// `POST /addresses/` response.
#[derive(Debug, Deserialize)]
pub struct AddressResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub street1: String,
    #[serde(default)]
    pub street2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub is_residential: Option<bool>,
    #[serde(default)]
    pub validation_results: Option<ValidationResults>,
}

#[derive(Debug, Deserialize)]
pub struct ValidationResults {
    #[serde(default)]
    pub is_valid: Option<bool>,
    #[serde(default)]
    pub messages: Vec<MessageResponse>,
}

impl AddressResponse {
    /// Merge the validated address over what was submitted.
    ///
    /// Fields Shippo leaves blank keep the submitted value. The address needs
    /// correction when Shippo says it is invalid or changed any line of it.
    #[must_use]
    pub fn into_validation(self, submitted: &ShippingAddress) -> AddressValidation {
        let pick = |validated: String, original: &str| {
            if validated.trim().is_empty() {
                original.to_string()
            } else {
                validated
            }
        };

        let address = ShippingAddress {
            name: pick(self.name, &submitted.name),
            street1: pick(self.street1, &submitted.street1),
            street2: self
                .street2
                .filter(|s| !s.trim().is_empty())
                .or_else(|| submitted.street2.clone()),
            city: pick(self.city, &submitted.city),
            state: pick(self.state, &submitted.state),
            zip: pick(self.zip, &submitted.zip),
            country: pick(self.country, &submitted.country),
            phone: submitted.phone.clone(),
            email: submitted.email.clone(),
            is_residential: self.is_residential.or(submitted.is_residential),
        };

        let (is_valid, messages) = self
            .validation_results
            .map_or((true, Vec::new()), |results| {
                (results.is_valid.unwrap_or(true), results.messages)
            });

        let changed = [
            (&address.street1, &submitted.street1),
            (&address.city, &submitted.city),
            (&address.state, &submitted.state),
            (&address.zip, &submitted.zip),
        ]
        .iter()
        .any(|(a, b)| !a.trim().eq_ignore_ascii_case(b.trim()));

        AddressValidation {
            is_residential: address.is_residential.unwrap_or(true),
            address,
            needs_correction: !is_valid || changed,
            suggestions: messages
                .into_iter()
                .map(|m| m.text)
                .filter(|text| !text.is_empty())
                .collect(),
        }
    }
}

/// `POST /transactions/` response.
#[derive(Debug, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub object_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub label_url: Option<String>,
    #[serde(default)]
    pub eta: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageResponse>,
}

impl TransactionResponse {
    /// Turn a transaction into a label record for `rate`.
    ///
    /// # Errors
    ///
    /// Returns `LabelFailed` unless the transaction succeeded with a tracking
    /// number and label URL.
    pub fn into_label(self, rate: &ShippingRate) -> Result<LabelRecord, ShippoError> {
        let failure = || {
            let reason = self
                .messages
                .iter()
                .map(|m| m.text.as_str())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("; ");
            if reason.is_empty() {
                format!("transaction status {}", self.status)
            } else {
                reason
            }
        };

        if !self.status.eq_ignore_ascii_case("SUCCESS") {
            return Err(ShippoError::LabelFailed(failure()));
        }
        let (Some(tracking_number), Some(label_url)) =
            (self.tracking_number.clone(), self.label_url.clone())
        else {
            return Err(ShippoError::LabelFailed(failure()));
        };

        Ok(LabelRecord {
            tracking_number,
            label_url,
            packing_slip_url: None,
            eta: self.eta.clone(),
            cost: rate.price,
            carrier: rate.provider.clone(),
            service_level: rate.service_level.name.clone(),
        })
    }
}
