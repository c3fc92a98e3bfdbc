//! Session-related types.

use cookie_courier_core::CheckoutId;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the shopper's checkout id.
    pub const CHECKOUT_ID: &str = "checkout_id";
}

/// The checkout id stored in the session, creating one on first use.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn checkout_id(session: &Session) -> Result<CheckoutId, tower_sessions::session::Error> {
    if let Some(id) = session.get::<CheckoutId>(keys::CHECKOUT_ID).await? {
        return Ok(id);
    }

    let id = CheckoutId::generate();
    session.insert(keys::CHECKOUT_ID, id).await?;
    tracing::debug!(checkout_id = %id, "Started checkout");
    Ok(id)
}
