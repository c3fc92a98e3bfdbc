//! Checkout handoff route.

use axum::{Json, extract::State};
use cookie_courier_core::{CartLine, CheckoutHandoff, CustomerInfo, validate_cart};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::checkout_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub items: Vec<CartLine>,
    pub customer: CustomerInfo,
}

/// Build the payment handoff from the cart and the confirmed shipping rate.
#[instrument(skip(state, session, request), fields(items = request.items.len()))]
pub async fn summary(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<CheckoutHandoff>> {
    validate_cart(&request.items)?;

    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;
    let selection = flow
        .lock()
        .await
        .selection()
        .cloned()
        .ok_or_else(|| AppError::Conflict("no confirmed shipping selection".to_string()))?;

    let handoff = CheckoutHandoff::new(request.items, request.customer, selection)?;
    tracing::info!(
        checkout_id = %id,
        total = %handoff.total,
        "Checkout handoff prepared"
    );
    Ok(Json(handoff))
}
