use chrono::Utc;

use super::feed::build_feed_with_limit;
use super::notification_model::NotificationEvent;
use crate::constants::MAX_NOTIFICATIONS;
use crate::sources::SourceFetchers;

/// Fetches the activity sources and builds the notification feed.
#[derive(Clone)]
pub struct NotificationService {
    fetchers: SourceFetchers,
    limit: usize,
}

impl NotificationService {
    pub fn new(fetchers: SourceFetchers) -> Self {
        Self {
            fetchers,
            limit: MAX_NOTIFICATIONS,
        }
    }

    /// Overrides the feed length (mainly for an expanded "all activity" view).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn fetchers(&self) -> &SourceFetchers {
        &self.fetchers
    }

    /// One aggregation pass. Never fails and never returns an empty feed.
    pub async fn latest(&self) -> Vec<NotificationEvent> {
        let batch = self.fetchers.fetch_all().await;
        log::debug!(
            "Building notification feed from {} records ({} appointments, {} waiting, {} payments)",
            batch.len(),
            batch.appointments.len(),
            batch.waiting_room.len(),
            batch.payments.len()
        );
        build_feed_with_limit(batch, Utc::now(), self.limit)
    }
}
