//! Session middleware configuration.
//!
//! Sessions only carry the shopper's checkout id, so an in-memory store is
//! enough; a restart starts everyone on a fresh checkout.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::services::checkout_store::CHECKOUT_IDLE_TIMEOUT;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cc_session";

/// Create the session layer with an in-memory store.
///
/// The session outlives its checkout state by no more than the checkout idle
/// timeout.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let idle_seconds = i64::try_from(CHECKOUT_IDLE_TIMEOUT.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
