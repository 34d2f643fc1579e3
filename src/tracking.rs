//! src/tracking.rs
use crate::domain::{NotificationRequest, OrderId, TrackingNumber};
use crate::fedex::{FedexClient, NotificationResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Where tracking numbers live once saved. Owned by the host shop system.
pub trait TrackingStore: Send + Sync {
    fn tracking_number(&self, order_id: OrderId) -> Option<TrackingNumber>;
    fn save(&self, order_id: OrderId, tracking_number: TrackingNumber);
    fn delete(&self, order_id: OrderId);
}

#[derive(Debug, Default)]
pub struct InMemoryTrackingStore {
    tracking_numbers: Mutex<HashMap<OrderId, TrackingNumber>>,
}

impl InMemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackingStore for InMemoryTrackingStore {
    fn tracking_number(&self, order_id: OrderId) -> Option<TrackingNumber> {
        self.tracking_numbers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&order_id)
            .cloned()
    }

    fn save(&self, order_id: OrderId, tracking_number: TrackingNumber) {
        self.tracking_numbers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order_id, tracking_number);
    }

    fn delete(&self, order_id: OrderId) {
        self.tracking_numbers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&order_id);
    }
}

/// Order in which a new tracking number is stored and FedEx is notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistOrdering {
    /// Notify first; keep the tracking number only if FedEx accepted it,
    /// otherwise drop whatever was stored for the order.
    NotifyThenPersist,
    /// Store the tracking number, then notify. The number is kept whatever
    /// FedEx answers.
    PersistThenNotify,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// The order already carries this tracking number; FedEx was not called.
    Unchanged,
    Processed {
        persisted: bool,
        notification: NotificationResult,
    },
}

impl SaveOutcome {
    pub fn notification_failed(&self) -> bool {
        matches!(self, SaveOutcome::Processed { notification, .. } if !notification.success)
    }
}

/// Stores `request.tracking_number` for its order and notifies FedEx, in the
/// given `ordering`. Nothing happens when the order already has this number.
///
/// The lookup and the later write are separate store calls. Two saves for the
/// same order running at once may both notify; serializing saves per order is
/// left to the store or its caller.
#[tracing::instrument(
    name = "Saving a tracking number",
    skip(client, store, request),
    fields(
        order_id = %request.order_id,
        tracking_number = %request.tracking_number
    )
)]
pub async fn save_tracking_number(
    client: &FedexClient,
    store: &dyn TrackingStore,
    request: &NotificationRequest,
    ordering: PersistOrdering,
) -> SaveOutcome {
    if store.tracking_number(request.order_id).as_ref() == Some(&request.tracking_number) {
        tracing::info!("Tracking number unchanged, skipping notification");
        return SaveOutcome::Unchanged;
    }

    match ordering {
        PersistOrdering::NotifyThenPersist => {
            let notification = client.send_notification(request).await;
            if notification.success {
                store.save(request.order_id, request.tracking_number.clone());
            } else {
                store.delete(request.order_id);
            }
            SaveOutcome::Processed {
                persisted: notification.success,
                notification,
            }
        }
        PersistOrdering::PersistThenNotify => {
            store.save(request.order_id, request.tracking_number.clone());
            let notification = client.send_notification(request).await;
            SaveOutcome::Processed {
                persisted: true,
                notification,
            }
        }
    }
}
