//! Integration tests for Cookie Courier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cookie-courier-integration-tests
//! ```
//!
//! Each test starts the storefront router on an ephemeral port and talks to
//! it over HTTP with a cookie-keeping client, so every [`TestContext`] is one
//! shopper session. The carrier API is either absent (development mode),
//! unreachable, or the in-process [`mock_shippo`] server.
//!
//! # Test Categories
//!
//! - `shipping_flow` - Rate fetch, selection, confirmation, stale responses
//! - `labels_and_checkout` - Label purchase, address validation, handoff

pub mod mock_shippo;

use std::time::Duration;

use cookie_courier_core::ShippingAddress;
use cookie_courier_storefront::config::{ShippoConfig, StorefrontConfig};
use cookie_courier_storefront::state::AppState;
use mock_shippo::MockShippo;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Error type for harness setup.
pub type SetupError = Box<dyn std::error::Error + Send + Sync>;

/// A running storefront plus the client acting as one shopper.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: Url,
    server: JoinHandle<()>,
    _shippo: Option<MockShippo>,
}

impl TestContext {
    /// Storefront without a carrier token (development mode).
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be started.
    pub async fn offline() -> Result<Self, SetupError> {
        Self::start(shippo_config("http://127.0.0.1:9/", None)?, None).await
    }

    /// Storefront with a token but nothing listening at the carrier URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be started.
    pub async fn unreachable() -> Result<Self, SetupError> {
        // Bind and release a port so nothing answers there.
        let addr = TcpListener::bind("127.0.0.1:0").await?.local_addr()?;
        let config = shippo_config(&format!("http://{addr}/"), Some(mock_shippo::TOKEN))?;
        Self::start(config, None).await
    }

    /// Storefront talking to the mock carrier API.
    ///
    /// # Errors
    ///
    /// Returns an error if either server cannot be started.
    pub async fn with_mock_shippo() -> Result<Self, SetupError> {
        let shippo = MockShippo::start().await?;
        let config = shippo_config(&shippo.base_url(), Some(mock_shippo::TOKEN))?;
        Self::start(config, Some(shippo)).await
    }

    async fn start(shippo: ShippoConfig, mock: Option<MockShippo>) -> Result<Self, SetupError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            shippo,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let app = cookie_courier_storefront::app(AppState::new(config)?);
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&format!("http://{addr}/"))?,
            server,
            _shippo: mock,
        })
    }

    /// Absolute URL for a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid relative URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|e| panic!("bad test path {path}: {e}"))
    }

    /// GET a storefront path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(self.url(path)).send().await
    }

    /// POST a JSON body to a storefront path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Result<reqwest::Response> {
        self.client.post(self.url(path)).json(body).send().await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn shippo_config(api_url: &str, token: Option<&str>) -> Result<ShippoConfig, SetupError> {
    Ok(ShippoConfig {
        api_url: Url::parse(api_url)?,
        api_token: token.map(|t| SecretString::from(t.to_string())),
        timeout: Duration::from_secs(5),
        ship_from: ShippingAddress {
            name: "Cookie Courier Kitchen".to_string(),
            street1: "1 Oven Ln".to_string(),
            city: "Trenton".to_string(),
            state: "NJ".to_string(),
            zip: "08608".to_string(),
            country: "US".to_string(),
            is_residential: Some(false),
            ..Default::default()
        },
    })
}

// =============================================================================
// Fixtures
// =============================================================================

/// A destination in `zip`.
#[must_use]
pub fn address(city: &str, state: &str, zip: &str) -> Value {
    json!({
        "name": "Ada Baker",
        "street1": "125 Ellison St",
        "city": city,
        "state": state,
        "zip": zip,
        "country": "US",
        "email": "ada@example.com"
    })
}

/// A cart with `quantity` cookies at 17.50 each.
#[must_use]
pub fn cart(quantity: u32) -> Value {
    json!([{ "name": "Brown Butter Chocolate Chip", "quantity": quantity, "unit_price": "17.50" }])
}

/// Body for `POST /api/shipping/rates`.
#[must_use]
pub fn rates_request(zip: &str) -> Value {
    json!({
        "address_to": address("Newark", "NJ", zip),
        "items": cart(6)
    })
}
