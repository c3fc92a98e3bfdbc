//! Rate quoting with an offline fallback.
//!
//! A fetch is a probe followed by a quote. Any failure along the way turns
//! into [`FetchOutcome::Unavailable`], which the rate flow answers with the
//! sample rates. There is exactly one attempt per fetch; no retries.

use std::future::Future;

use cookie_courier_core::{FetchOutcome, Parcel, ShippingAddress, ShippingRate};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::shippo::{ShippoClient, ShippoError};

/// Everything needed to ask a carrier for rates.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub address_to: ShippingAddress,
    pub parcel: Parcel,
}

/// A source of carrier rate quotes.
pub trait RateQuoter {
    /// Cheap connectivity check made before every quote.
    fn probe(&self) -> impl Future<Output = Result<(), ShippoError>> + Send;

    /// Rates for the request, in the order the carrier returned them.
    fn quote(
        &self,
        request: &QuoteRequest,
    ) -> impl Future<Output = Result<Vec<ShippingRate>, ShippoError>> + Send;
}

impl RateQuoter for ShippoClient {
    async fn probe(&self) -> Result<(), ShippoError> {
        Self::probe(self).await
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<ShippingRate>, ShippoError> {
        self.create_shipment(&request.address_to, &request.parcel)
            .await
    }
}

/// Probe, then quote. Never fails: errors become `Unavailable`.
#[instrument(skip(quoter, request), fields(zip = %request.address_to.zip))]
pub async fn fetch_rates<Q>(quoter: &Q, request: &QuoteRequest) -> FetchOutcome
where
    Q: RateQuoter + Sync,
{
    let result = match quoter.probe().await {
        Ok(()) => quoter.quote(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(rates) => FetchOutcome::Quoted(rates),
        Err(e) => {
            let reason = e.to_string();
            tracing::warn!(error = %reason, "Rate quote unavailable, offering sample rates");
            add_breadcrumb(
                "shipping",
                "Sample rates offered",
                Some(&[("reason", reason.as_str())]),
            );
            FetchOutcome::Unavailable { reason }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cookie_courier_core::{CartLine, CurrencyCode, Price, RateId, ServiceLevel};
    use rust_decimal::Decimal;

    use super::*;

    struct Offline;

    impl RateQuoter for Offline {
        async fn probe(&self) -> Result<(), ShippoError> {
            Err(ShippoError::Api {
                status: 503,
                message: "unreachable".to_string(),
            })
        }

        async fn quote(&self, _: &QuoteRequest) -> Result<Vec<ShippingRate>, ShippoError> {
            unreachable!("quote must not run after a failed probe")
        }
    }

    struct Fixed {
        rates: Vec<ShippingRate>,
        quotes: AtomicUsize,
        fail_quote: bool,
    }

    impl RateQuoter for Fixed {
        async fn probe(&self) -> Result<(), ShippoError> {
            Ok(())
        }

        async fn quote(&self, _: &QuoteRequest) -> Result<Vec<ShippingRate>, ShippoError> {
            self.quotes.fetch_add(1, Ordering::SeqCst);
            if self.fail_quote {
                Err(ShippoError::Parse("bad body".to_string()))
            } else {
                Ok(self.rates.clone())
            }
        }
    }

    fn request() -> QuoteRequest {
        QuoteRequest {
            address_to: ShippingAddress {
                zip: "07505".to_string(),
                ..Default::default()
            },
            parcel: Parcel::for_cart(&[CartLine {
                name: "Tin".to_string(),
                quantity: 2,
                unit_price: Decimal::TEN,
            }])
            .unwrap(),
        }
    }

    fn rate(id: &str) -> ShippingRate {
        ShippingRate {
            id: RateId::new(id),
            provider: "USPS".to_string(),
            service_level: ServiceLevel {
                name: "Priority Mail".to_string(),
                token: None,
            },
            price: Price::from_cents(935, CurrencyCode::USD),
            estimated_days: Some(2),
        }
    }

    #[tokio::test]
    async fn test_failed_probe_is_unavailable() {
        let outcome = fetch_rates(&Offline, &request()).await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_failed_quote_is_unavailable() {
        let quoter = Fixed {
            rates: Vec::new(),
            quotes: AtomicUsize::new(0),
            fail_quote: true,
        };
        let outcome = fetch_rates(&quoter, &request()).await;

        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
        assert_eq!(quoter.quotes.load(Ordering::SeqCst), 1, "no retry");
    }

    #[tokio::test]
    async fn test_quoted_rates_pass_through_in_order() {
        let quoter = Fixed {
            rates: vec![rate("b"), rate("a"), rate("c")],
            quotes: AtomicUsize::new(0),
            fail_quote: false,
        };
        let outcome = fetch_rates(&quoter, &request()).await;

        assert_eq!(
            outcome,
            FetchOutcome::Quoted(vec![rate("b"), rate("a"), rate("c")])
        );
    }

    #[tokio::test]
    async fn test_unconfigured_shippo_is_unavailable() {
        let config = crate::config::ShippoConfig {
            api_url: url::Url::parse("https://api.goshippo.com").unwrap(),
            api_token: None,
            timeout: std::time::Duration::from_secs(1),
            ship_from: ShippingAddress::default(),
        };
        let client = ShippoClient::new(&config).unwrap();

        let outcome = fetch_rates(&client, &request()).await;

        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }
}
