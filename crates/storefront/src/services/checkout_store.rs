//! In-memory checkout state keyed by checkout id.
//!
//! Holds each shopper's rate flow and the last label bought for it. Entries
//! expire after a period of inactivity; an abandoned checkout simply ages out.

use std::sync::Arc;
use std::time::Duration;

use cookie_courier_core::{CheckoutId, LabelRecord, RateFlow};
use moka::future::Cache;
use tokio::sync::Mutex;

/// How long an untouched checkout is kept.
pub const CHECKOUT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on concurrently tracked checkouts.
const MAX_CHECKOUTS: u64 = 10_000;

/// A flow shared between the requests of one checkout.
pub type SharedFlow = Arc<Mutex<RateFlow>>;

/// Checkout state for all active shoppers.
#[derive(Clone)]
pub struct CheckoutStore {
    flows: Cache<CheckoutId, SharedFlow>,
    labels: Cache<CheckoutId, LabelRecord>,
}

impl Default for CheckoutStore {
    fn default() -> Self {
        Self::new(CHECKOUT_IDLE_TIMEOUT)
    }
}

impl CheckoutStore {
    /// Create a store whose entries expire after `idle_timeout` without access.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            flows: Cache::builder()
                .max_capacity(MAX_CHECKOUTS)
                .time_to_idle(idle_timeout)
                .build(),
            labels: Cache::builder()
                .max_capacity(MAX_CHECKOUTS)
                .time_to_idle(idle_timeout)
                .build(),
        }
    }

    /// The flow for `id`, created `Idle` on first use.
    pub async fn flow(&self, id: CheckoutId) -> SharedFlow {
        self.flows
            .get_with(id, async { Arc::new(Mutex::new(RateFlow::new())) })
            .await
    }

    /// Record the label bought for `id`, replacing any earlier one.
    pub async fn save_label(&self, id: CheckoutId, label: LabelRecord) {
        self.labels.insert(id, label).await;
    }

    /// The last label bought for `id`.
    pub async fn label(&self, id: CheckoutId) -> Option<LabelRecord> {
        self.labels.get(&id).await
    }
}

#[cfg(test)]
mod tests {
    use cookie_courier_core::{CurrencyCode, FlowState, Price};

    use super::*;

    #[tokio::test]
    async fn test_flow_is_shared_per_checkout() {
        let store = CheckoutStore::default();
        let id = CheckoutId::generate();

        let ticket = store.flow(id).await.lock().await.begin();

        let again = store.flow(id).await;
        assert_eq!(again.lock().await.state(), &FlowState::Loading { ticket });

        let other = store.flow(CheckoutId::generate()).await;
        assert_eq!(other.lock().await.state(), &FlowState::Idle);
    }

    #[tokio::test]
    async fn test_label_round_trip() {
        let store = CheckoutStore::default();
        let id = CheckoutId::generate();
        assert!(store.label(id).await.is_none());

        let label = LabelRecord {
            tracking_number: "1Z999".to_string(),
            label_url: "https://labels.example/1.pdf".to_string(),
            packing_slip_url: None,
            eta: None,
            cost: Price::from_cents(1425, CurrencyCode::USD),
            carrier: "UPS".to_string(),
            service_level: "Ground".to_string(),
        };
        store.save_label(id, label.clone()).await;

        assert_eq!(store.label(id).await, Some(label));
    }
}
