//! Shipping route handlers.
//!
//! The rate flow for a checkout lives in the checkout store. A rate request
//! takes a ticket under the flow lock, releases the lock while the carrier is
//! called, and applies the result only if no newer request took over.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use cookie_courier_core::{
    CartLine, DeliveryEstimate, FlowState, LabelRecord, Parcel, RateFlow, RateId, Receipt,
    ShippingAddress, ShippingSelection, ShippingWindow, correct_address, validate_cart,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::checkout_id;
use crate::services::{QuoteRequest, fetch_rates};
use crate::state::AppState;

/// The storefront's notion of "today", read once per request.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// =============================================================================
// Views
// =============================================================================

/// Flow state plus the notice text to show next to the rates.
#[derive(Debug, Serialize)]
pub struct FlowView {
    #[serde(flatten)]
    pub state: FlowState,
    pub message: Option<&'static str>,
}

impl From<&RateFlow> for FlowView {
    fn from(flow: &RateFlow) -> Self {
        let message = match flow.state() {
            FlowState::RatesReady {
                notice: Some(notice),
                ..
            } => Some(notice.message()),
            _ => None,
        };
        Self {
            state: flow.state().clone(),
            message,
        }
    }
}

/// Delivery window preview.
#[derive(Debug, Serialize)]
pub struct WindowView {
    pub window: ShippingWindow,
    pub estimate: DeliveryEstimate,
    pub label: String,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct RatesRequest {
    pub address_to: ShippingAddress,
    pub items: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub rate_id: RateId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Preview the shipment date and delivery window for a service.
#[instrument]
pub async fn window(Query(query): Query<WindowQuery>) -> Json<WindowView> {
    let today = query.today.unwrap_or_else(today);
    let window = ShippingWindow::compute(today, &query.carrier, &query.service);
    let estimate = window.estimate();

    Json(WindowView {
        window,
        estimate,
        label: estimate.to_string(),
    })
}

/// Start a fresh rate fetch for this checkout.
///
/// Falls back to sample rates when the carrier is unreachable. Answers 400 for
/// a cart that cannot be packed, and 409 if a newer fetch for the same
/// checkout started while this one was in flight.
#[instrument(skip(state, session, request), fields(items = request.items.len()))]
pub async fn rates(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RatesRequest>,
) -> Result<Json<FlowView>> {
    validate_cart(&request.items)?;
    let parcel = Parcel::for_cart(&request.items)?;

    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;
    let ticket = flow.lock().await.begin();

    let (address_to, corrections) = correct_address(request.address_to);
    for note in &corrections {
        tracing::info!(checkout_id = %id, "Address corrected: {note}");
    }
    let quote = QuoteRequest { address_to, parcel };
    let outcome = fetch_rates(state.shippo(), &quote).await;

    let mut flow = flow.lock().await;
    match flow.receive(ticket, outcome) {
        Receipt::Applied => Ok(Json(FlowView::from(&*flow))),
        Receipt::Stale => {
            tracing::info!(checkout_id = %id, ticket = ticket.as_u64(), "Discarded stale rate response");
            Err(AppError::Conflict(
                "superseded by a newer rate request".to_string(),
            ))
        }
    }
}

/// Current flow state.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<FlowView>> {
    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;
    let flow = flow.lock().await;
    Ok(Json(FlowView::from(&*flow)))
}

/// Select one of the offered rates.
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SelectRequest>,
) -> Result<Json<FlowView>> {
    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;
    let mut flow = flow.lock().await;
    flow.select(&request.rate_id)?;
    Ok(Json(FlowView::from(&*flow)))
}

/// Confirm the selected rate and compute its delivery window.
#[instrument(skip(state, session))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ShippingSelection>> {
    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;
    let mut flow = flow.lock().await;
    let selection = flow.confirm(today())?.clone();

    add_breadcrumb(
        "shipping",
        "Rate confirmed",
        Some(&[
            ("carrier", selection.rate.provider.as_str()),
            ("service", selection.rate.service_level.name.as_str()),
        ]),
    );
    Ok(Json(selection))
}

/// Abandon the flow.
#[instrument(skip(state, session))]
pub async fn cancel(State(state): State<AppState>, session: Session) -> Result<Json<FlowView>> {
    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;
    let mut flow = flow.lock().await;
    flow.cancel();
    Ok(Json(FlowView::from(&*flow)))
}

/// Buy a label for the confirmed selection.
///
/// The selection is claimed under the flow lock before the carrier is called,
/// so a second request for the same checkout gets 409 instead of a second
/// label.
#[instrument(skip(state, session))]
pub async fn purchase_label(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<LabelRecord>> {
    let id = checkout_id(&session).await?;
    let flow = state.checkouts().flow(id).await;

    let rate = {
        let mut flow = flow.lock().await;
        let selection = flow
            .selection_mut()
            .ok_or_else(|| AppError::Conflict("no confirmed shipping selection".to_string()))?;
        selection.begin_label_purchase()?;
        selection.rate.clone()
    };

    let purchase = state.shippo().purchase_label(&rate).await;

    let mut guard = flow.lock().await;
    let selection = guard
        .selection_mut()
        .filter(|selection| selection.rate.id == rate.id);
    let label = match (purchase, selection) {
        (Ok(label), Some(selection)) => {
            selection.attach_label(&label);
            label
        }
        (Ok(label), None) => {
            tracing::warn!(checkout_id = %id, "Selection changed during label purchase");
            label
        }
        (Err(e), selection) => {
            if let Some(selection) = selection {
                selection.abort_label_purchase();
            }
            return Err(e.into());
        }
    };
    drop(guard);

    state.checkouts().save_label(id, label.clone()).await;
    Ok(Json(label))
}

/// The last label purchased for this checkout.
#[instrument(skip(state, session))]
pub async fn show_label(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<LabelRecord>> {
    let id = checkout_id(&session).await?;
    state
        .checkouts()
        .label(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no label purchased".to_string()))
}
