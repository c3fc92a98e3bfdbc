//! Shipping address and the locally known corrections.
//!
//! Addresses are not validated here. The carrier API does that; this module
//! only fixes the one mistake shoppers keep making before the address is sent.

use serde::{Deserialize, Serialize};

/// A destination (or origin) address as entered on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShippingAddress {
    pub name: String,
    pub street1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_residential: Option<bool>,
}

/// Result of running an address through correction and carrier validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValidation {
    /// The address to use from here on.
    pub address: ShippingAddress,
    /// Whether the shopper should review the corrected address.
    pub needs_correction: bool,
    /// Human-readable notes about what was changed or looks wrong.
    pub suggestions: Vec<String>,
    /// Whether the carrier classifies the address as residential.
    pub is_residential: bool,
}

/// Apply the known local corrections.
///
/// Paterson is in New Jersey; a Paterson address entered with state `NY` is
/// moved to `NJ`. Returns the address and a note per applied correction.
#[must_use]
pub fn correct_address(mut address: ShippingAddress) -> (ShippingAddress, Vec<String>) {
    let mut notes = Vec::new();

    if address.city.to_lowercase().contains("paterson")
        && address.state.trim().eq_ignore_ascii_case("NY")
    {
        address.state = "NJ".to_string();
        notes.push("Paterson is in New Jersey; state changed from NY to NJ".to_string());
    }

    (address, notes)
}
