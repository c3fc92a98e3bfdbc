//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::CheckoutStore;
use crate::shippo::{ShippoClient, ShippoError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the carrier client and checkout store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shippo: ShippoClient,
    checkouts: CheckoutStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the carrier HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ShippoError> {
        let shippo = ShippoClient::new(&config.shippo)?;
        if !shippo.is_configured() {
            tracing::warn!("SHIPPO_API_TOKEN not set; running in development mode with sample rates");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shippo,
                checkouts: CheckoutStore::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the carrier API client.
    #[must_use]
    pub fn shippo(&self) -> &ShippoClient {
        &self.inner.shippo
    }

    /// Get a reference to the checkout store.
    #[must_use]
    pub fn checkouts(&self) -> &CheckoutStore {
        &self.inner.checkouts
    }
}
