use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visual weight of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Success,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity a feed entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Appointment,
    WaitingRoom,
    Payment,
    Dashboard,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Appointment => "appointment",
            EntityKind::WaitingRoom => "waiting_room",
            EntityKind::Payment => "payment",
            EntityKind::Dashboard => "dashboard",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link rendered next to a feed entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    /// Route of the target view (e.g. "/appointments/12")
    pub href: String,
    /// Human-readable button label
    pub label: String,
}

impl NotificationAction {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// One entry of the notification feed.
///
/// Built fresh on every aggregation pass and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Deterministic id: `<entity>-<entity_id>`
    pub id: String,
    /// `None` when the source record had no readable timestamp
    pub timestamp: Option<DateTime<Utc>>,
    pub actor: String,
    pub entity: EntityKind,
    pub entity_id: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

impl NotificationEvent {
    pub(crate) fn make_id(entity: EntityKind, entity_id: &str) -> String {
        format!("{}-{}", entity.as_str(), entity_id)
    }
}
