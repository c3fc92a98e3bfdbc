//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cookie_courier_core::{CartError, FlowError, LabelError};
use thiserror::Error;

use crate::shippo::ShippoError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Carrier API operation failed.
    #[error("Shippo error: {0}")]
    Shippo(#[from] ShippoError),

    /// Rate selection transition not allowed in the current state.
    #[error("Rate selection error: {0}")]
    Flow(#[from] FlowError),

    /// Cart lines cannot be priced or packed.
    #[error("Invalid cart: {0}")]
    Cart(#[from] CartError),

    /// Label cannot be bought for the current selection.
    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with the checkout's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Session(_) | Self::Internal(_) | Self::Shippo(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shippo(ShippoError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Shippo(_) => StatusCode::BAD_GATEWAY,
            Self::Flow(FlowError::UnknownRate(_))
            | Self::Label(LabelError::SampleRate)
            | Self::Cart(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Flow(_) | Self::Label(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Shippo(ShippoError::NotConfigured) => {
                "Shipping service is not configured".to_string()
            }
            Self::Shippo(ShippoError::LabelFailed(reason)) => {
                format!("Label purchase failed: {reason}")
            }
            Self::Shippo(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for checkout actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use cookie_courier_core::RateId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("label".to_string());
        assert_eq!(err.to_string(), "Not found: label");

        let err = AppError::Flow(FlowError::NothingSelected);
        assert_eq!(err.to_string(), "Rate selection error: no rate selected");
    }

    #[test]
    fn test_flow_error_status_codes() {
        assert_eq!(
            get_status(AppError::Flow(FlowError::NothingSelected)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Flow(FlowError::NotReady)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Flow(FlowError::UnknownRate(RateId::new("x")))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_cart_and_label_status_codes() {
        assert_eq!(
            get_status(AppError::Cart(CartError::TooManyItems)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Label(LabelError::SampleRate)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Label(LabelError::InProgress)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Label(LabelError::AlreadyPurchased)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Shippo(ShippoError::NotConfigured)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Shippo(ShippoError::Api {
                status: 500,
                message: "boom".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
