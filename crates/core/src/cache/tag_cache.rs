use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::cache_tag::{CacheTag, Mutation};

/// Handle returned by [`TagCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback run when one of its tags is invalidated.
///
/// Must be fast and non-blocking: typically it pokes a refresh trigger.
pub type InvalidationCallback = Arc<dyn Fn(CacheTag) + Send + Sync>;

/// Registry mapping tags to subscriber callbacks.
#[derive(Default)]
pub struct TagCache {
    subscribers: RwLock<HashMap<CacheTag, Vec<(SubscriptionId, InvalidationCallback)>>>,
    next_id: AtomicU64,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, tag: CacheTag, callback: F) -> SubscriptionId
    where
        F: Fn(CacheTag) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        match self.subscribers.write() {
            Ok(mut subs) => subs.entry(tag).or_default().push((id, Arc::new(callback))),
            Err(e) => log::error!("Tag cache lock poisoned, subscription to {} dropped: {}", tag, e),
        }
        id
    }

    /// Removes a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut subs) = self.subscribers.write() else {
            return false;
        };
        let mut removed = false;
        for callbacks in subs.values_mut() {
            let before = callbacks.len();
            callbacks.retain(|(sub_id, _)| *sub_id != id);
            removed |= callbacks.len() != before;
        }
        subs.retain(|_, callbacks| !callbacks.is_empty());
        removed
    }

    pub fn subscriber_count(&self, tag: CacheTag) -> usize {
        self.subscribers
            .read()
            .map(|subs| subs.get(&tag).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Invalidates the given tags and returns how many callbacks ran.
    ///
    /// Duplicate tags are collapsed. Callbacks run after the lock is
    /// released, so they may subscribe or invalidate themselves.
    pub fn invalidate(&self, tags: &[CacheTag]) -> usize {
        let unique: BTreeSet<CacheTag> = tags.iter().copied().collect();
        let to_call: Vec<(CacheTag, InvalidationCallback)> = match self.subscribers.read() {
            Ok(subs) => unique
                .iter()
                .flat_map(|tag| {
                    subs.get(tag)
                        .into_iter()
                        .flatten()
                        .map(move |(_, cb)| (*tag, cb.clone()))
                })
                .collect(),
            Err(e) => {
                log::error!("Tag cache lock poisoned, invalidation skipped: {}", e);
                return 0;
            }
        };

        log::debug!(
            "Invalidating tags {:?} ({} subscribers)",
            unique,
            to_call.len()
        );
        for (tag, callback) in &to_call {
            callback(*tag);
        }
        to_call.len()
    }

    pub fn invalidate_for(&self, mutation: Mutation) -> usize {
        self.invalidate(mutation.affected_tags())
    }
}
