use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

/// Monotonic token taken when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

struct SnapshotInner<T> {
    next_ticket: AtomicU64,
    applied: Mutex<u64>,
    tx: watch::Sender<Option<Arc<T>>>,
}

/// Last-value-wins slot keyed by fetch start order.
///
/// A value published with an older ticket than the one already applied is
/// dropped, so results are ordered by when their request began rather than
/// when it finished.
pub struct LatestSnapshot<T> {
    inner: Arc<SnapshotInner<T>>,
}

impl<T> Clone for LatestSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for LatestSnapshot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSnapshot<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(SnapshotInner {
                next_ticket: AtomicU64::new(0),
                applied: Mutex::new(0),
                tx,
            }),
        }
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.inner.next_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stores `value` unless a value from a newer ticket is already in place.
    pub fn publish(&self, ticket: Ticket, value: T) -> bool {
        let mut applied = self
            .inner
            .applied
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if ticket.0 <= *applied {
            return false;
        }
        *applied = ticket.0;
        self.inner.tx.send_replace(Some(Arc::new(value)));
        true
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_published() {
        let slot: LatestSnapshot<u32> = LatestSnapshot::new();
        assert!(slot.current().is_none());
        let t = slot.begin();
        assert!(slot.publish(t, 7));
        assert_eq!(slot.current().as_deref(), Some(&7));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let slot = LatestSnapshot::new();
        let older = slot.begin();
        let newer = slot.begin();
        assert!(older < newer);

        assert!(slot.publish(newer, "fresh"));
        assert!(!slot.publish(older, "stale"));
        assert_eq!(slot.current().as_deref(), Some(&"fresh"));
    }

    #[test]
    fn test_same_ticket_publishes_once() {
        let slot = LatestSnapshot::new();
        let t = slot.begin();
        assert!(slot.publish(t, 1));
        assert!(!slot.publish(t, 2));
        assert_eq!(slot.current().as_deref(), Some(&1));
    }

    #[tokio::test]
    async fn test_subscribers_see_published_value() {
        let slot = LatestSnapshot::new();
        let mut rx = slot.subscribe();
        let clone = slot.clone();

        let t = clone.begin();
        clone.publish(t, String::from("feed"));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_deref().map(String::as_str), Some("feed"));
    }
}
