//! Confirmed shipping choice and purchased label records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rate::ShippingRate;
use crate::types::Price;
use crate::window::ShippingWindow;

/// Tracking number placeholder until a label is purchased.
pub const PENDING_TRACKING: &str = "PENDING";

/// The rate a shopper confirmed, with its delivery window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSelection {
    pub rate: ShippingRate,
    pub window: ShippingWindow,
    pub tracking_number: String,
    pub label_url: Option<String>,
    pub cost: Price,
    #[serde(default)]
    pub label_status: LabelStatus,
}

/// Progress of the label for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    #[default]
    Pending,
    /// A purchase request is with the carrier.
    Purchasing,
    Purchased,
}

/// Why a label cannot be bought for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("a label was already purchased for this selection")]
    AlreadyPurchased,
    #[error("a label purchase is already in progress")]
    InProgress,
    #[error("sample rates cannot be purchased")]
    SampleRate,
}

impl ShippingSelection {
    /// Build the selection for `rate` as confirmed on `today`.
    #[must_use]
    pub fn new(rate: ShippingRate, today: NaiveDate) -> Self {
        let window = ShippingWindow::compute(today, &rate.provider, &rate.service_level.name);
        let cost = rate.price;

        Self {
            rate,
            window,
            tracking_number: PENDING_TRACKING.to_string(),
            label_url: None,
            cost,
            label_status: LabelStatus::Pending,
        }
    }

    /// Whether a label has been bought for this selection.
    #[must_use]
    pub fn has_label(&self) -> bool {
        self.label_status == LabelStatus::Purchased
    }

    /// Claim this selection for a label purchase.
    ///
    /// At most one purchase may be in flight, and only while no label exists.
    ///
    /// # Errors
    ///
    /// Returns a [`LabelError`] if the selection cannot be purchased now.
    pub fn begin_label_purchase(&mut self) -> Result<(), LabelError> {
        match self.label_status {
            LabelStatus::Purchased => Err(LabelError::AlreadyPurchased),
            LabelStatus::Purchasing => Err(LabelError::InProgress),
            LabelStatus::Pending if self.rate.is_sample() => Err(LabelError::SampleRate),
            LabelStatus::Pending => {
                self.label_status = LabelStatus::Purchasing;
                Ok(())
            }
        }
    }

    /// Release a claim after a failed purchase.
    pub fn abort_label_purchase(&mut self) {
        if self.label_status == LabelStatus::Purchasing {
            self.label_status = LabelStatus::Pending;
        }
    }

    /// Record a purchased label against this selection.
    pub fn attach_label(&mut self, label: &LabelRecord) {
        self.tracking_number.clone_from(&label.tracking_number);
        self.label_url = Some(label.label_url.clone());
        self.label_status = LabelStatus::Purchased;
    }
}

/// The last purchased label, kept for display after purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub tracking_number: String,
    pub label_url: String,
    pub packing_slip_url: Option<String>,
    /// Carrier's estimated arrival, as reported.
    pub eta: Option<String>,
    pub cost: Price,
    pub carrier: String,
    pub service_level: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Days;

    use super::*;
    use crate::rate::sample_rates;
    use crate::types::RateId;

    #[test]
    fn test_new_selection_is_pending() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let rate = sample_rates()[2].clone();
        let selection = ShippingSelection::new(rate.clone(), today);

        assert_eq!(selection.tracking_number, "PENDING");
        assert!(selection.label_url.is_none());
        assert!(!selection.has_label());
        assert_eq!(selection.label_status, LabelStatus::Pending);
        assert_eq!(selection.cost, rate.price);
        // UPS Ground from a Friday
        assert_eq!(selection.window.shipment_date, today + Days::new(10));
        assert_eq!(selection.window.max_transit_days, 5);
    }

    #[test]
    fn test_attach_label() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let mut selection = ShippingSelection::new(sample_rates()[0].clone(), today);
        let label = LabelRecord {
            tracking_number: "9400100000000000000000".to_string(),
            label_url: "https://labels.example/abc.pdf".to_string(),
            packing_slip_url: None,
            eta: None,
            cost: selection.cost,
            carrier: "USPS".to_string(),
            service_level: "Ground".to_string(),
        };

        selection.attach_label(&label);

        assert!(selection.has_label());
        assert_eq!(selection.label_url.as_deref(), Some("https://labels.example/abc.pdf"));
    }

    fn live_selection() -> ShippingSelection {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let mut rate = sample_rates()[0].clone();
        rate.id = RateId::new("rate_07102_usps_ground");
        ShippingSelection::new(rate, today)
    }

    #[test]
    fn test_only_one_purchase_at_a_time() {
        let mut selection = live_selection();

        assert_eq!(selection.begin_label_purchase(), Ok(()));
        assert_eq!(selection.label_status, LabelStatus::Purchasing);
        assert_eq!(selection.begin_label_purchase(), Err(LabelError::InProgress));
    }

    #[test]
    fn test_aborted_purchase_can_be_retried() {
        let mut selection = live_selection();
        selection.begin_label_purchase().unwrap();

        selection.abort_label_purchase();

        assert_eq!(selection.label_status, LabelStatus::Pending);
        assert_eq!(selection.begin_label_purchase(), Ok(()));
    }

    #[test]
    fn test_no_purchase_after_label() {
        let mut selection = live_selection();
        selection.begin_label_purchase().unwrap();
        selection.attach_label(&LabelRecord {
            tracking_number: "9400100000000000000001".to_string(),
            label_url: "https://labels.example/def.pdf".to_string(),
            packing_slip_url: None,
            eta: None,
            cost: selection.cost,
            carrier: "USPS".to_string(),
            service_level: "Ground".to_string(),
        });

        selection.abort_label_purchase();

        assert!(selection.has_label());
        assert_eq!(
            selection.begin_label_purchase(),
            Err(LabelError::AlreadyPurchased)
        );
    }

    #[test]
    fn test_sample_rate_cannot_be_claimed() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let mut selection = ShippingSelection::new(sample_rates()[0].clone(), today);

        assert_eq!(selection.begin_label_purchase(), Err(LabelError::SampleRate));
        assert_eq!(selection.label_status, LabelStatus::Pending);
    }
}
