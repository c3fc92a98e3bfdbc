//! Address validation route.

use axum::{Json, extract::State};
use cookie_courier_core::{AddressValidation, ShippingAddress, correct_address};
use tracing::instrument;

use crate::shippo::ShippoError;
use crate::state::AppState;

/// Correct an address locally, then ask the carrier to validate it.
///
/// Validation never blocks checkout: if the carrier cannot be reached the
/// locally corrected address is returned as-is.
#[instrument(skip(state, address), fields(zip = %address.zip))]
pub async fn validate(
    State(state): State<AppState>,
    Json(address): Json<ShippingAddress>,
) -> Json<AddressValidation> {
    let (corrected, notes) = correct_address(address);

    let validation = match state.shippo().validate_address(&corrected).await {
        Ok(mut validation) => {
            if !notes.is_empty() {
                let mut suggestions = notes;
                suggestions.append(&mut validation.suggestions);
                validation.suggestions = suggestions;
                validation.needs_correction = true;
            }
            validation
        }
        Err(e) => {
            if !matches!(e, ShippoError::NotConfigured) {
                tracing::warn!(error = %e, "Address validation unavailable; using local corrections");
            }
            local_only(corrected, notes)
        }
    };

    Json(validation)
}

fn local_only(address: ShippingAddress, notes: Vec<String>) -> AddressValidation {
    AddressValidation {
        is_residential: address.is_residential.unwrap_or(true),
        needs_correction: !notes.is_empty(),
        suggestions: notes,
        address,
    }
}
