//! Shippo REST API client.

use std::sync::Arc;

use cookie_courier_core::{AddressValidation, LabelRecord, Parcel, ShippingAddress, ShippingRate};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::ShippoError;
use super::types::{
    AddressPayload, AddressResponse, ParcelPayload, ShipmentRequest, ShipmentResponse,
    TransactionRequest, TransactionResponse,
};
use crate::config::ShippoConfig;

/// Label format requested when buying a label.
const LABEL_FILE_TYPE: &str = "PDF_4x6";

/// Shippo REST API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ShippoClient {
    inner: Arc<ShippoClientInner>,
}

struct ShippoClientInner {
    client: reqwest::Client,
    api_url: Url,
    token: Option<SecretString>,
    ship_from: ShippingAddress,
}

impl ShippoClient {
    /// Create a new Shippo API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ShippoConfig) -> Result<Self, ShippoError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'
        let mut api_url = config.api_url.clone();
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ShippoClientInner {
                client,
                api_url,
                token: config.api_token.clone(),
                ship_from: config.ship_from.clone(),
            }),
        })
    }

    /// Whether an API token is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.token.is_some()
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Check that the API is reachable and the token is accepted.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without a token, otherwise any HTTP or API error.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<(), ShippoError> {
        let request = self.request(reqwest::Method::GET, "carrier_accounts/?results=1")?;
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    /// Create a shipment and return the rates offered for it, in API order.
    ///
    /// Rates that cannot be converted (unknown currency, malformed amount) are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without a token, otherwise any HTTP or API error.
    #[instrument(skip(self, address_to), fields(zip = %address_to.zip, weight = %parcel.weight))]
    pub async fn create_shipment(
        &self,
        address_to: &ShippingAddress,
        parcel: &Parcel,
    ) -> Result<Vec<ShippingRate>, ShippoError> {
        let body = ShipmentRequest {
            address_from: AddressPayload::from(&self.inner.ship_from),
            address_to: AddressPayload::from(address_to),
            parcels: vec![ParcelPayload::from(parcel)],
            run_async: false,
        };
        let request = self.request(reqwest::Method::POST, "shipments/")?.json(&body);
        let response: ShipmentResponse = self.send(request).await?;

        for message in &response.messages {
            tracing::debug!(
                source = message.source.as_deref().unwrap_or_default(),
                code = message.code.as_deref().unwrap_or_default(),
                "Shipment message: {}",
                message.text
            );
        }

        let rates = response
            .rates
            .into_iter()
            .filter_map(|rate| {
                ShippingRate::try_from(rate)
                    .inspect_err(|e| tracing::warn!("Skipping rate: {e}"))
                    .ok()
            })
            .collect::<Vec<_>>();

        tracing::info!(
            shipment = response.object_id.as_deref().unwrap_or_default(),
            count = rates.len(),
            "Received rates"
        );
        Ok(rates)
    }

    /// Validate an address.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without a token, otherwise any HTTP or API error.
    #[instrument(skip(self, address), fields(zip = %address.zip))]
    pub async fn validate_address(
        &self,
        address: &ShippingAddress,
    ) -> Result<AddressValidation, ShippoError> {
        let body = AddressPayload {
            validate: Some(true),
            ..AddressPayload::from(address)
        };
        let request = self.request(reqwest::Method::POST, "addresses/")?.json(&body);
        let response: AddressResponse = self.send(request).await?;
        Ok(response.into_validation(address))
    }

    /// Buy a label for `rate`.
    ///
    /// # Errors
    ///
    /// Returns `LabelFailed` when the transaction does not succeed, `NotConfigured`
    /// without a token, otherwise any HTTP or API error.
    #[instrument(skip(self, rate), fields(rate = %rate.id, carrier = %rate.provider))]
    pub async fn purchase_label(&self, rate: &ShippingRate) -> Result<LabelRecord, ShippoError> {
        let body = TransactionRequest {
            rate: rate.id.as_str(),
            label_file_type: LABEL_FILE_TYPE,
            run_async: false,
        };
        let request = self
            .request(reqwest::Method::POST, "transactions/")?
            .json(&body);
        let response: TransactionResponse = self.send(request).await?;
        let transaction = response.object_id.clone().unwrap_or_default();

        let label = response.into_label(rate)?;
        tracing::info!(
            transaction = %transaction,
            tracking_number = %label.tracking_number,
            "Label purchased"
        );
        Ok(label)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, ShippoError> {
        let token = self.inner.token.as_ref().ok_or(ShippoError::NotConfigured)?;
        let url = self
            .inner
            .api_url
            .join(path)
            .map_err(|e| ShippoError::Parse(format!("invalid endpoint {path}: {e}")))?;

        Ok(self
            .inner
            .client
            .request(method, url)
            .header(
                "Authorization",
                format!("ShippoToken {}", token.expose_secret()),
            )
            .header("Accept", "application/json"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ShippoError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShippoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ShippoError::Parse(e.to_string()))
    }
}
