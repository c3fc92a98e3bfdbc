//! Rate selection state machine.
//!
//! ```text
//! Idle ──begin──▶ Loading ──receive──▶ RatesReady ──confirm──▶ Confirmed
//!                   │                    │  ▲
//!                   │                    └──┘ select (exclusive)
//!                   └──receive(no rates)──▶ Failed
//!
//! begin: from any state, starts a fresh fetch
//! cancel: from any state, back to Idle
//! ```
//!
//! Each `begin` hands out a [`Ticket`]. A fetch result is only applied when
//! it carries the ticket of the fetch currently loading, so a slow response
//! can never overwrite the result of a newer one.
//!
//! An unreachable carrier API is not a failure: the flow lands in
//! `RatesReady` with the sample rates and a [`RateNotice`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rate::{ShippingRate, sample_rates};
use crate::selection::ShippingSelection;
use crate::types::RateId;

/// Identifies one rate fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// What came back from the carrier API for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The API answered with these rates, in the order received.
    Quoted(Vec<ShippingRate>),
    /// The API could not be reached or rejected the request.
    Unavailable { reason: String },
}

/// Non-blocking notice shown alongside the rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateNotice {
    SampleRates,
}

impl RateNotice {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::SampleRates => "using sample rates — development mode",
        }
    }
}

/// Why the flow ended up in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The API answered but offered no service for this address and parcel.
    NoRatesAvailable,
}

/// Which rate, if any, the shopper has picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choice {
    #[default]
    NoneSelected,
    OneSelected { rate_id: RateId },
}

/// Where the flow is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    Loading {
        ticket: Ticket,
    },
    RatesReady {
        rates: Vec<ShippingRate>,
        notice: Option<RateNotice>,
        choice: Choice,
    },
    Failed {
        reason: FailureReason,
    },
    Confirmed {
        selection: ShippingSelection,
    },
}

/// Whether a fetch result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    Applied,
    /// A newer fetch was started (or the flow was cancelled) meanwhile.
    Stale,
}

/// Invalid transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("rates are not ready")]
    NotReady,
    #[error("no rate selected")]
    NothingSelected,
    #[error("unknown rate: {0}")]
    UnknownRate(RateId),
}

/// One shopper's rate selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateFlow {
    state: FlowState,
    last_ticket: u64,
}

impl RateFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    /// Start a fresh fetch, discarding anything in progress.
    pub fn begin(&mut self) -> Ticket {
        self.last_ticket = self.last_ticket.wrapping_add(1);
        let ticket = Ticket(self.last_ticket);
        self.state = FlowState::Loading { ticket };
        ticket
    }

    /// Apply the result of the fetch identified by `ticket`.
    pub fn receive(&mut self, ticket: Ticket, outcome: FetchOutcome) -> Receipt {
        match self.state {
            FlowState::Loading { ticket: current } if current == ticket => {}
            _ => return Receipt::Stale,
        }

        self.state = match outcome {
            FetchOutcome::Quoted(rates) if rates.is_empty() => FlowState::Failed {
                reason: FailureReason::NoRatesAvailable,
            },
            FetchOutcome::Quoted(rates) => FlowState::RatesReady {
                rates,
                notice: None,
                choice: Choice::NoneSelected,
            },
            FetchOutcome::Unavailable { .. } => FlowState::RatesReady {
                rates: sample_rates(),
                notice: Some(RateNotice::SampleRates),
                choice: Choice::NoneSelected,
            },
        };
        Receipt::Applied
    }

    /// Select one rate, replacing any earlier selection.
    ///
    /// # Errors
    ///
    /// `NotReady` outside `RatesReady`, `UnknownRate` if the id was not offered.
    pub fn select(&mut self, rate_id: &RateId) -> Result<&ShippingRate, FlowError> {
        let FlowState::RatesReady { rates, choice, .. } = &mut self.state else {
            return Err(FlowError::NotReady);
        };
        let rate = rates
            .iter()
            .find(|rate| &rate.id == rate_id)
            .ok_or_else(|| FlowError::UnknownRate(rate_id.clone()))?;
        *choice = Choice::OneSelected {
            rate_id: rate_id.clone(),
        };
        Ok(rate)
    }

    /// Confirm the selected rate as of `today`.
    ///
    /// # Errors
    ///
    /// `NotReady` outside `RatesReady`, `NothingSelected` when no rate is picked.
    pub fn confirm(&mut self, today: NaiveDate) -> Result<&ShippingSelection, FlowError> {
        let rate = match &self.state {
            FlowState::RatesReady {
                rates,
                choice: Choice::OneSelected { rate_id },
                ..
            } => rates
                .iter()
                .find(|rate| &rate.id == rate_id)
                .cloned()
                .ok_or_else(|| FlowError::UnknownRate(rate_id.clone()))?,
            FlowState::RatesReady { .. } => return Err(FlowError::NothingSelected),
            _ => return Err(FlowError::NotReady),
        };

        self.state = FlowState::Confirmed {
            selection: ShippingSelection::new(rate, today),
        };
        match &self.state {
            FlowState::Confirmed { selection } => Ok(selection),
            _ => Err(FlowError::NotReady),
        }
    }

    /// Drop everything and return to `Idle`.
    pub fn cancel(&mut self) {
        self.state = FlowState::Idle;
    }

    /// Rates on offer, if any.
    #[must_use]
    pub fn rates(&self) -> &[ShippingRate] {
        match &self.state {
            FlowState::RatesReady { rates, .. } => rates,
            _ => &[],
        }
    }

    /// The rate currently selected but not yet confirmed.
    #[must_use]
    pub fn selected_rate(&self) -> Option<&ShippingRate> {
        match &self.state {
            FlowState::RatesReady {
                rates,
                choice: Choice::OneSelected { rate_id },
                ..
            } => rates.iter().find(|rate| &rate.id == rate_id),
            _ => None,
        }
    }

    /// The confirmed selection.
    #[must_use]
    pub const fn selection(&self) -> Option<&ShippingSelection> {
        match &self.state {
            FlowState::Confirmed { selection } => Some(selection),
            _ => None,
        }
    }

    /// The confirmed selection, for recording a purchased label.
    pub const fn selection_mut(&mut self) -> Option<&mut ShippingSelection> {
        match &mut self.state {
            FlowState::Confirmed { selection } => Some(selection),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Days;
    use rust_decimal::Decimal;

    use super::*;
    use crate::rate::ServiceLevel;
    use crate::types::{CurrencyCode, Price};

    fn rate(id: &str, provider: &str, service: &str) -> ShippingRate {
        ShippingRate {
            id: RateId::new(id),
            provider: provider.to_string(),
            service_level: ServiceLevel {
                name: service.to_string(),
                token: None,
            },
            price: Price::new(Decimal::new(999, 2), CurrencyCode::USD),
            estimated_days: None,
        }
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let flow = RateFlow::new();
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.rates().is_empty());
    }

    #[test]
    fn test_quoted_rates_keep_received_order() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        let received = vec![
            rate("r2", "UPS", "UPS Ground"),
            rate("r1", "USPS", "Priority Mail"),
            rate("r3", "FedEx", "FedEx Ground"),
        ];

        assert_eq!(
            flow.receive(ticket, FetchOutcome::Quoted(received.clone())),
            Receipt::Applied
        );
        assert_eq!(flow.rates(), received.as_slice());
        assert!(matches!(
            flow.state(),
            FlowState::RatesReady {
                notice: None,
                choice: Choice::NoneSelected,
                ..
            }
        ));
    }

    #[test]
    fn test_unavailable_falls_back_to_sample_rates() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(
            ticket,
            FetchOutcome::Unavailable {
                reason: "connection refused".to_string(),
            },
        );

        assert_eq!(flow.rates().len(), 3);
        assert!(flow.rates().iter().all(ShippingRate::is_sample));
        assert!(matches!(
            flow.state(),
            FlowState::RatesReady {
                notice: Some(RateNotice::SampleRates),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_quote_fails_and_can_retry() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(ticket, FetchOutcome::Quoted(Vec::new()));
        assert!(matches!(flow.state(), FlowState::Failed { .. }));

        let retry = flow.begin();
        assert!(retry > ticket);
        flow.receive(retry, FetchOutcome::Quoted(vec![rate("r1", "USPS", "Ground")]));
        assert_eq!(flow.rates().len(), 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut flow = RateFlow::new();
        let first = flow.begin();
        let second = flow.begin();

        flow.receive(second, FetchOutcome::Quoted(vec![rate("new", "UPS", "Ground")]));
        let receipt = flow.receive(first, FetchOutcome::Quoted(vec![rate("old", "UPS", "Ground")]));

        assert_eq!(receipt, Receipt::Stale);
        assert_eq!(flow.rates()[0].id, RateId::new("new"));
    }

    #[test]
    fn test_response_after_cancel_is_discarded() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.cancel();

        let receipt = flow.receive(ticket, FetchOutcome::Quoted(vec![rate("r1", "UPS", "Ground")]));

        assert_eq!(receipt, Receipt::Stale);
        assert_eq!(flow.state(), &FlowState::Idle);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(
            ticket,
            FetchOutcome::Quoted(vec![rate("a", "USPS", "Ground"), rate("b", "UPS", "Ground")]),
        );

        flow.select(&RateId::new("a")).unwrap();
        flow.select(&RateId::new("b")).unwrap();

        assert_eq!(flow.selected_rate().unwrap().id, RateId::new("b"));
    }

    #[test]
    fn test_select_unknown_rate() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(ticket, FetchOutcome::Quoted(vec![rate("a", "USPS", "Ground")]));

        let err = flow.select(&RateId::new("zzz")).unwrap_err();
        assert_eq!(err, FlowError::UnknownRate(RateId::new("zzz")));
        assert!(flow.selected_rate().is_none());
    }

    #[test]
    fn test_select_before_rates_ready() {
        let mut flow = RateFlow::new();
        assert_eq!(flow.select(&RateId::new("a")).unwrap_err(), FlowError::NotReady);
        flow.begin();
        assert_eq!(flow.select(&RateId::new("a")).unwrap_err(), FlowError::NotReady);
    }

    #[test]
    fn test_confirm_requires_selection() {
        let mut flow = RateFlow::new();
        assert_eq!(flow.confirm(friday()).unwrap_err(), FlowError::NotReady);

        let ticket = flow.begin();
        flow.receive(ticket, FetchOutcome::Quoted(vec![rate("a", "USPS", "Ground")]));
        assert_eq!(flow.confirm(friday()).unwrap_err(), FlowError::NothingSelected);
    }

    #[test]
    fn test_confirm_computes_window() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(ticket, FetchOutcome::Quoted(vec![rate("ups", "UPS", "UPS Ground")]));
        flow.select(&RateId::new("ups")).unwrap();

        let selection = flow.confirm(friday()).unwrap().clone();

        let shipment = friday() + Days::new(10);
        assert_eq!(selection.window.shipment_date, shipment);
        assert_eq!(selection.window.min_delivery_date, shipment + Days::new(1));
        assert_eq!(selection.window.max_delivery_date, shipment + Days::new(5));
        assert_eq!(selection.tracking_number, "PENDING");
        assert_eq!(flow.selection(), Some(&selection));
        assert!(flow.rates().is_empty());
    }

    #[test]
    fn test_cancel_discards_selection() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(ticket, FetchOutcome::Quoted(vec![rate("a", "USPS", "Ground")]));
        flow.select(&RateId::new("a")).unwrap();
        flow.confirm(friday()).unwrap();

        flow.cancel();

        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.selection().is_none());
    }

    #[test]
    fn test_begin_after_confirm_starts_over() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(ticket, FetchOutcome::Quoted(vec![rate("a", "USPS", "Ground")]));
        flow.select(&RateId::new("a")).unwrap();
        flow.confirm(friday()).unwrap();

        let next = flow.begin();

        assert_eq!(flow.state(), &FlowState::Loading { ticket: next });
        assert!(flow.selection().is_none());
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let mut flow = RateFlow::new();
        let ticket = flow.begin();
        flow.receive(
            ticket,
            FetchOutcome::Unavailable {
                reason: "offline".to_string(),
            },
        );
        flow.select(&RateId::new("sample_ups_ground")).unwrap();

        let json = serde_json::to_value(flow.state()).unwrap();
        assert_eq!(json["status"], "rates_ready");
        assert_eq!(json["notice"], "sample_rates");
        assert_eq!(json["choice"]["kind"], "one_selected");
        assert_eq!(json["choice"]["rate_id"], "sample_ups_ground");
    }
}
