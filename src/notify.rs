//! Broadcast of item and property updates to interested listeners.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEventKind {
    Added,
    Updated,
    Deleted,
    PropertyUpdated,
}

/// One change to a persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEvent {
    pub kind: ItemEventKind,
    pub type_name: String,
    pub id: String,
    /// Set only for `PropertyUpdated`.
    pub property: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Fan-out of [`ItemEvent`]s. Slow receivers observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    sender: broadcast::Sender<ItemEvent>,
}

impl Default for UpdateNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl UpdateNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ItemEvent> {
        self.sender.subscribe()
    }

    pub fn notify_item_updated(&self, kind: ItemEventKind, type_name: &str, id: &str) {
        self.publish(ItemEvent {
            kind,
            type_name: type_name.to_string(),
            id: id.to_string(),
            property: None,
            timestamp: Utc::now(),
        });
    }

    pub fn notify_property_updated(&self, type_name: &str, id: &str, property: &str) {
        self.publish(ItemEvent {
            kind: ItemEventKind::PropertyUpdated,
            type_name: type_name.to_string(),
            id: id.to_string(),
            property: Some(property.to_string()),
            timestamp: Utc::now(),
        });
    }

    fn publish(&self, event: ItemEvent) {
        // An error only means nobody is listening.
        if self.sender.send(event).is_err() {
            trace!("Item event dropped: no subscribers");
        }
    }
}
