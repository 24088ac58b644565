//! Timer-driven refresh primitives.
//!
//! [`PeriodicTask`] runs a job on a fixed period with on-demand extra runs,
//! and [`LatestSnapshot`] holds the newest result so that a slow response
//! never overwrites a fresher one.

mod periodic_task;
mod snapshot;

pub use periodic_task::{spawn_poller, PeriodicTask, RefreshTrigger};
pub use snapshot::{LatestSnapshot, Ticket};
