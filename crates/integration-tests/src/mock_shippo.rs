//! In-process stand-in for the Shippo REST API.
//!
//! Answers the four endpoints the storefront calls. Behavior is keyed on the
//! destination ZIP so a test can pick an outcome by choosing an address.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Token the mock accepts.
pub const TOKEN: &str = "shippo_test_7f3a9c2e8b1d4f60a5e2";

/// Destination ZIP for which no service is offered.
pub const EMPTY_ZIP: &str = "00000";

/// Destination ZIP whose quotes and label purchases are held back by
/// [`SLOW_DELAY`].
pub const SLOW_ZIP: &str = "99999";

/// How long [`SLOW_ZIP`] requests take.
pub const SLOW_DELAY: Duration = Duration::from_millis(600);

/// Tracking number on every purchased label.
pub const TRACKING_NUMBER: &str = "9400111899223817763014";

/// A running mock server. Stops when dropped.
pub struct MockShippo {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockShippo {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router()).await;
        });

        Ok(Self { addr, handle })
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for MockShippo {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router() -> Router {
    Router::new()
        .route("/carrier_accounts/", get(carrier_accounts))
        .route("/shipments/", post(shipments))
        .route("/addresses/", post(addresses))
        .route("/transactions/", post(transactions))
}

type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("ShippoToken {TOKEN}");
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|value| value == expected)
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Invalid token." })),
    )
}

async fn carrier_accounts(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "results": [] })))
}

async fn shipments(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let zip = body
        .pointer("/address_to/zip")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if zip == SLOW_ZIP {
        tokio::time::sleep(SLOW_DELAY).await;
    }

    let rates = if zip == EMPTY_ZIP {
        json!([])
    } else {
        json!([
            {
                "object_id": format!("rate_{zip}_ups_ground"),
                "provider": "UPS",
                "servicelevel": { "name": "UPS Ground", "token": "ups_ground" },
                "amount": "14.25",
                "currency": "USD",
                "estimated_days": 4
            },
            {
                "object_id": format!("rate_{zip}_usps_priority"),
                "provider": "USPS",
                "servicelevel": { "name": "Priority Mail", "token": "usps_priority" },
                "amount": "9.10",
                "currency": "USD",
                "estimated_days": 2
            }
        ])
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "object_id": format!("shp_{zip}"),
            "status": "SUCCESS",
            "rates": rates,
            "messages": []
        })),
    )
}

async fn addresses(headers: HeaderMap, Json(mut body): Json<Value>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let has_zip = body
        .get("zip")
        .and_then(Value::as_str)
        .is_some_and(|zip| !zip.is_empty());

    if let Some(fields) = body.as_object_mut() {
        fields.remove("validate");
        fields.insert("object_id".to_string(), json!("adr_test"));
        fields.insert("is_residential".to_string(), json!(true));
        fields.insert(
            "validation_results".to_string(),
            if has_zip {
                json!({ "is_valid": true, "messages": [] })
            } else {
                json!({
                    "is_valid": false,
                    "messages": [{ "source": "Shippo", "code": "zip", "text": "Zip code is required" }]
                })
            },
        );
    }

    (StatusCode::CREATED, Json(body))
}

async fn transactions(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let rate = body
        .get("rate")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if rate.contains(SLOW_ZIP) {
        tokio::time::sleep(SLOW_DELAY).await;
    }

    let transaction = if rate.starts_with("rate_") {
        json!({
            "object_id": "txn_test",
            "status": "SUCCESS",
            "tracking_number": TRACKING_NUMBER,
            "label_url": format!("https://labels.test/{rate}.pdf"),
            "eta": null,
            "messages": []
        })
    } else {
        json!({
            "object_id": "txn_test",
            "status": "ERROR",
            "messages": [{ "text": format!("Rate {rate} not found") }]
        })
    };

    (StatusCode::CREATED, Json(transaction))
}
