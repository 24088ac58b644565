//! Background refresh pollers.
//!
//! Five pollers keep the snapshots served by the API current:
//! appointments and waiting room on the fast period, notifications,
//! dashboard and BCV rate on the slow one. Each poller is also registered
//! with the tag cache so that an invalidation refreshes it immediately,
//! and every new snapshot is pushed to SSE clients through the event bus.

use std::sync::Arc;

use clinicdesk_core::{
    cache::{CacheTag, SubscriptionId, TagCache},
    polling::{spawn_poller, LatestSnapshot, PeriodicTask},
};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::events::{
    EventBus, ServerEvent, APPOINTMENTS_UPDATED, DASHBOARD_UPDATED, NOTIFICATIONS_UPDATED,
    RATE_UPDATED, WAITING_ROOM_UPDATED,
};
use crate::main_lib::AppState;

/// Running pollers and their tag subscriptions. Dropping it stops them.
pub struct Pollers {
    tasks: Vec<PeriodicTask>,
    forwarders: Vec<JoinHandle<()>>,
    subscriptions: Vec<SubscriptionId>,
    tag_cache: Arc<TagCache>,
}

impl Pollers {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn all_running(&self) -> bool {
        self.tasks.iter().all(PeriodicTask::is_running)
    }

    pub fn shutdown(self) {
        tracing::info!("Stopping {} refresh pollers", self.tasks.len());
    }
}

impl Drop for Pollers {
    fn drop(&mut self) {
        for task in &mut self.tasks {
            task.stop();
        }
        for forwarder in &self.forwarders {
            forwarder.abort();
        }
        for id in self.subscriptions.drain(..) {
            self.tag_cache.unsubscribe(id);
        }
    }
}

/// Starts all pollers. The first run of each happens immediately.
pub fn start_refresh_scheduler(state: Arc<AppState>) -> Pollers {
    let snapshots = state.snapshots.clone();
    let mut pollers = Pollers {
        tasks: Vec::new(),
        forwarders: Vec::new(),
        subscriptions: Vec::new(),
        tag_cache: state.tag_cache.clone(),
    };

    let service = state.notification_service.clone();
    let task = spawn_poller(
        "notifications",
        state.slow_refresh,
        snapshots.notifications.clone(),
        move || {
            let service = service.clone();
            async move { Some(service.latest().await) }
        },
    );
    // The feed is built from all three sources, so any of their tags refreshes it.
    pollers.register(
        task,
        &[
            CacheTag::Notifications,
            CacheTag::Appointments,
            CacheTag::WaitingRoom,
            CacheTag::Payments,
        ],
    );

    let service = state.dashboard_service.clone();
    let task = spawn_poller(
        "dashboard",
        state.slow_refresh,
        snapshots.dashboard.clone(),
        move || {
            let service = service.clone();
            async move {
                match service.refresh().await {
                    Ok(view) => Some(view),
                    Err(e) => {
                        tracing::warn!("Dashboard refresh failed, keeping last view: {}", e);
                        None
                    }
                }
            }
        },
    );
    pollers.register(task, &[CacheTag::Dashboard]);

    let resolver = state.rate_resolver.clone();
    let task = spawn_poller(
        "bcv-rate",
        state.slow_refresh,
        snapshots.rate.clone(),
        move || {
            let resolver = resolver.clone();
            async move { Some(resolver.get_rate().await) }
        },
    );
    pollers.register(task, &[CacheTag::Rate]);

    let fetchers = state.fetchers.clone();
    let task = spawn_poller(
        "appointments",
        state.fast_refresh,
        snapshots.appointments.clone(),
        move || {
            let fetchers = fetchers.clone();
            async move { Some(fetchers.fetch_appointments_today().await) }
        },
    );
    pollers.register(task, &[CacheTag::Appointments]);

    let fetchers = state.fetchers.clone();
    let task = spawn_poller(
        "waiting-room",
        state.fast_refresh,
        snapshots.waiting_room.clone(),
        move || {
            let fetchers = fetchers.clone();
            async move { Some(fetchers.fetch_waiting_room_today().await) }
        },
    );
    pollers.register(task, &[CacheTag::WaitingRoom]);

    let bus = &state.event_bus;
    pollers.forwarders = vec![
        forward_updates(&snapshots.notifications, bus.clone(), NOTIFICATIONS_UPDATED),
        forward_updates(&snapshots.dashboard, bus.clone(), DASHBOARD_UPDATED),
        forward_updates(&snapshots.rate, bus.clone(), RATE_UPDATED),
        forward_updates(&snapshots.appointments, bus.clone(), APPOINTMENTS_UPDATED),
        forward_updates(&snapshots.waiting_room, bus.clone(), WAITING_ROOM_UPDATED),
    ];

    tracing::info!(
        "Refresh scheduler started ({} pollers, fast {:?}, slow {:?})",
        pollers.len(),
        state.fast_refresh,
        state.slow_refresh
    );
    pollers
}

impl Pollers {
    /// Keeps `task` alive and refreshes it whenever one of `tags` is invalidated.
    fn register(&mut self, task: PeriodicTask, tags: &[CacheTag]) {
        for tag in tags {
            let trigger = task.trigger();
            let name = task.name().to_string();
            let id = self.tag_cache.subscribe(*tag, move |tag| {
                tracing::debug!("{} invalidated, refreshing {}", tag, name);
                trigger.fire();
            });
            self.subscriptions.push(id);
        }
        self.tasks.push(task);
    }
}

/// Publishes every new value of `slot` on the event bus as `name`.
fn forward_updates<T>(slot: &LatestSnapshot<T>, bus: EventBus, name: &'static str) -> JoinHandle<()>
where
    T: Serialize + Send + Sync + 'static,
{
    let mut updates = slot.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let event = ServerEvent::from_snapshot(name, updates.borrow_and_update().as_deref());
            match event {
                Ok(event) => bus.publish(event),
                Err(e) => tracing::error!("Failed to serialize {} payload: {}", name, e),
            }
        }
    })
}
