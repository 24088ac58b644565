//! Notification feed module.
//!
//! Turns the three activity sources into a short, newest-first feed:
//!
//! ```text
//! SourceFetchers → SourceBatch → normalizer → build_feed → NotificationEvent[]
//! ```
//!
//! - **Model** (`notification_model.rs`) - NotificationEvent, Severity, EntityKind
//! - **Normalizer** (`normalizer.rs`) - per-source mapping with severity rules
//! - **Feed** (`feed.rs`) - merge, sort, truncate, placeholder
//! - **Service** (`notification_service.rs`) - fetch + build in one call

mod feed;
mod normalizer;
mod notification_model;
mod notification_service;

pub use feed::{build_feed, build_feed_with_limit, placeholder_event};
pub use normalizer::{
    normalize, normalize_appointment, normalize_payment, normalize_waiting_room, payment_severity,
};
pub use notification_model::{EntityKind, NotificationAction, NotificationEvent, Severity};
pub use notification_service::NotificationService;
