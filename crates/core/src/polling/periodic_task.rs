use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};

use super::snapshot::LatestSnapshot;

/// Cloneable handle that forces an extra run of a [`PeriodicTask`].
#[derive(Clone, Default)]
pub struct RefreshTrigger {
    notify: Arc<Notify>,
}

impl RefreshTrigger {
    pub fn fire(&self) {
        self.notify.notify_one();
    }
}

/// A job run immediately and then once per period until stopped.
///
/// Each run is spawned, so a slow run never delays the next tick. Stopping
/// the task (or dropping it) aborts the loop and every run still in flight.
pub struct PeriodicTask {
    name: String,
    trigger: RefreshTrigger,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(name: impl Into<String>, period: Duration, job: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let trigger = RefreshTrigger::default();
        let notify = trigger.notify.clone();
        let label = name.clone();

        let handle = tokio::spawn(async move {
            log::debug!("Periodic task '{}' started ({:?} period)", label, period);
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight = JoinSet::new();

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = notify.notified() => {
                        log::debug!("Periodic task '{}' refresh requested", label);
                    }
                    Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                        if let Err(e) = joined {
                            if e.is_panic() {
                                log::warn!("Periodic task '{}' run panicked: {}", label, e);
                            }
                        }
                        continue;
                    }
                }
                in_flight.spawn(job());
            }
        });

        Self {
            name,
            trigger,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn refresh_now(&self) {
        self.trigger.fire();
    }

    pub fn trigger(&self) -> RefreshTrigger {
        self.trigger.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("Periodic task '{}' stopped", self.name);
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Polls `fetch` every `period` and publishes results into `slot`.
///
/// A `None` result keeps the previous snapshot. A result whose fetch started
/// before the snapshot's current value is discarded.
pub fn spawn_poller<T, F, Fut>(
    name: &str,
    period: Duration,
    slot: LatestSnapshot<T>,
    fetch: F,
) -> PeriodicTask
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let label = name.to_string();
    PeriodicTask::spawn(name, period, move || {
        let ticket = slot.begin();
        let pending = fetch();
        let slot = slot.clone();
        let label = label.clone();
        async move {
            match pending.await {
                Some(value) => {
                    if !slot.publish(ticket, value) {
                        log::debug!("{}: discarded result superseded by a newer fetch", label);
                    }
                }
                None => log::debug!("{}: no value this round, keeping previous snapshot", label),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_task(period: Duration) -> (PeriodicTask, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = PeriodicTask::spawn("counter", period, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_every_period() {
        let (task, runs) = counting_task(Duration::from_secs(20));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert!(task.is_running());
        assert_eq!(task.name(), "counter");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_forces_extra_run() {
        let (task, runs) = counting_task(Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        task.trigger().fire();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_loop_and_in_flight_runs() {
        let finished = Arc::new(AtomicUsize::new(0));
        let flag = finished.clone();
        let mut task = PeriodicTask::spawn("slow", Duration::from_secs(5), move || {
            let flag = flag.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                flag.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        task.stop();
        assert!(!task.is_running());
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_discards_slow_stale_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let slot = LatestSnapshot::new();
        let counter = calls.clone();
        let _task = spawn_poller("rate", Duration::from_secs(10), slot.clone(), move || {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Some("slow")
                } else {
                    Some("fast")
                }
            }
        });

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(calls.load(Ordering::SeqCst) >= 3);
        assert_eq!(slot.current().as_deref(), Some(&"fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_keeps_previous_value_on_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let slot = LatestSnapshot::new();
        let counter = calls.clone();
        let _task = spawn_poller("feed", Duration::from_secs(10), slot.clone(), move || {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            async move { (call == 0).then_some(42u32) }
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(slot.current().as_deref(), Some(&42));
    }
}
