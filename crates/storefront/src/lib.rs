//! Cookie Courier storefront library.
//!
//! This crate provides the shipping backend as a library, allowing the
//! router to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shippo;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::shippo::ShippoError;
use crate::state::AppState;

/// Build the storefront router with its session and tracing layers.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Probes the carrier API. Development mode has nothing to probe and is
/// always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.shippo().probe().await {
        Ok(()) | Err(ShippoError::NotConfigured) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Carrier API not reachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use cookie_courier_core::ShippingAddress;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{ShippoConfig, StorefrontConfig};

    fn offline_state() -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            shippo: ShippoConfig {
                api_url: Url::parse("https://api.goshippo.com").unwrap(),
                api_token: None,
                timeout: Duration::from_secs(5),
                ship_from: ShippingAddress::default(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_readiness_in_development_mode() {
        let app = app(offline_state());

        for uri in ["/health", "/health/ready"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_window_preview_route() {
        let response = app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/shipping/window?today=2026-10-11&carrier=USPS&service=Priority%20Mail%20Express")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        // Sunday order ships a week from Monday; Priority matches before Express.
        assert_eq!(json["window"]["shipment_date"], "2026-10-19");
        assert_eq!(json["window"]["min_transit_days"], 1);
        assert_eq!(json["window"]["max_transit_days"], 2);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app(offline_state())
            .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
