use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Event names pushed over `/api/v1/events/stream`, one per clinic snapshot.
pub const NOTIFICATIONS_UPDATED: &str = "notifications:updated";
pub const DASHBOARD_UPDATED: &str = "dashboard:updated";
pub const RATE_UPDATED: &str = "rate:updated";
pub const APPOINTMENTS_UPDATED: &str = "appointments:updated";
pub const WAITING_ROOM_UPDATED: &str = "waiting-room:updated";

/// One snapshot update: the event name plus the new notification feed,
/// dashboard view, BCV quote or agenda list. `payload` is `None` while the
/// snapshot has never been loaded.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
        }
    }

    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Some(payload),
        }
    }

    /// Builds the update for a snapshot slot's current value.
    pub fn from_snapshot<T: Serialize>(
        name: &'static str,
        snapshot: Option<&T>,
    ) -> Result<Self, serde_json::Error> {
        match snapshot {
            Some(value) => Ok(Self::with_payload(name, serde_json::to_value(value)?)),
            None => Ok(Self::new(name)),
        }
    }
}

/// Fans out clinic snapshot updates to every connected SSE client.
///
/// Fed by the refresh scheduler; a slow client drops the oldest updates
/// rather than holding back the pollers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // No listeners is not an error; lagging listeners drop old events.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(ServerEvent::with_payload(RATE_UPDATED, json!({"value": "36.5"})));
        bus.publish(ServerEvent::new(DASHBOARD_UPDATED));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.name, RATE_UPDATED);
        assert_eq!(first.payload, Some(json!({"value": "36.5"})));
        assert_eq!(rx.recv().await.unwrap().name, DASHBOARD_UPDATED);
    }

    #[test]
    fn test_snapshot_update_carries_feed_payload() {
        let feed = vec![json!({"id": "payment-9", "severity": "critical"})];
        let event = ServerEvent::from_snapshot(NOTIFICATIONS_UPDATED, Some(&feed)).unwrap();
        assert_eq!(event.name, NOTIFICATIONS_UPDATED);
        assert_eq!(event.payload, Some(json!([{"id": "payment-9", "severity": "critical"}])));

        let empty = ServerEvent::from_snapshot::<Vec<Value>>(WAITING_ROOM_UPDATED, None).unwrap();
        assert_eq!(empty.name, WAITING_ROOM_UPDATED);
        assert!(empty.payload.is_none());
    }

    #[test]
    fn test_publish_without_subscribers_is_ignored() {
        let bus = EventBus::new(1);
        bus.publish(ServerEvent::new(NOTIFICATIONS_UPDATED));
    }
}
