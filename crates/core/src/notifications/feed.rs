use chrono::{DateTime, Utc};

use super::normalizer::normalize;
use super::notification_model::{EntityKind, NotificationEvent, Severity};
use crate::constants::{MAX_NOTIFICATIONS, SYSTEM_ACTOR};
use crate::sources::SourceBatch;

const PLACEHOLDER_ENTITY_ID: &str = "empty";

/// Entry shown when no source produced any activity.
pub fn placeholder_event(now: DateTime<Utc>) -> NotificationEvent {
    NotificationEvent {
        id: format!("system-{}", PLACEHOLDER_ENTITY_ID),
        timestamp: Some(now),
        actor: SYSTEM_ACTOR.to_string(),
        entity: EntityKind::Dashboard,
        entity_id: PLACEHOLDER_ENTITY_ID.to_string(),
        message: "No activity recorded".to_string(),
        severity: Severity::Info,
        action: None,
    }
}

/// Builds the notification feed capped at [`MAX_NOTIFICATIONS`] entries.
pub fn build_feed(batch: SourceBatch, now: DateTime<Utc>) -> Vec<NotificationEvent> {
    build_feed_with_limit(batch, now, MAX_NOTIFICATIONS)
}

/// Normalizes every record, orders newest first and keeps the first `limit`.
///
/// The sort is stable, so records with equal timestamps keep source order
/// (appointments, waiting room, payments). Records without a timestamp sort
/// last. The result is never empty: a placeholder is returned instead.
pub fn build_feed_with_limit(
    batch: SourceBatch,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<NotificationEvent> {
    let mut events: Vec<NotificationEvent> = batch.into_records().iter().map(normalize).collect();

    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(limit.max(1));

    if events.is_empty() {
        events.push(placeholder_event(now));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{AppointmentSummary, PatientRef, PaymentSummary, WaitingRoomEntry};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
    }

    fn appointment(id: i64, at: &str) -> AppointmentSummary {
        AppointmentSummary {
            id,
            patient: Some(PatientRef::Name("Ana".to_string())),
            appointment_date: Some(at.to_string()),
            status: None,
        }
    }

    fn waiting(id: i64, at: Option<&str>) -> WaitingRoomEntry {
        WaitingRoomEntry {
            id,
            patient: Some(PatientRef::Name("Luis".to_string())),
            arrival_time: at.map(str::to_string),
            status: None,
            appointment: None,
        }
    }

    #[test]
    fn test_empty_sources_yield_single_placeholder() {
        let feed = build_feed(SourceBatch::default(), now());
        assert_eq!(feed.len(), 1);
        let only = &feed[0];
        assert_eq!(only.actor, "System");
        assert_eq!(only.entity, EntityKind::Dashboard);
        assert_eq!(only.message, "No activity recorded");
        assert_eq!(only.severity, Severity::Info);
        assert_eq!(only.timestamp, Some(now()));
    }

    #[test]
    fn test_scenario_appointment_and_pending_payment() {
        let batch = SourceBatch {
            appointments: vec![appointment(1, "2024-01-02T10:00")],
            waiting_room: vec![],
            payments: vec![PaymentSummary {
                id: 9,
                charge_order: Some(5),
                status: "pending".to_string(),
                amount: Some(dec!(20)),
                currency: Some("USD".to_string()),
                method: Some("cash".to_string()),
                patient: Some(PatientRef::Name("Ana".to_string())),
                received_at: None,
                appointment_date: Some("2024-01-02T09:00".to_string()),
            }],
        };

        let feed = build_feed(batch, now());
        assert_eq!(feed.len(), 2);
        // 10:00 appointment is newer than the 09:00 payment
        assert_eq!(feed[0].entity, EntityKind::Appointment);
        assert_eq!(feed[1].entity, EntityKind::Payment);
        assert_eq!(feed[1].severity, Severity::Warning);
        assert_eq!(
            feed[1].action.as_ref().unwrap().label,
            "Register Payment"
        );
    }

    #[test]
    fn test_payment_with_null_status_is_critical() {
        let payment: PaymentSummary = serde_json::from_str(
            r#"{"id": 9, "charge_order": 5, "status": null, "amount": "20.00",
                "currency": "USD", "method": "cash",
                "received_at": "2024-01-02T09:30:00"}"#,
        )
        .unwrap();
        let batch = SourceBatch {
            payments: vec![payment],
            ..Default::default()
        };

        let feed = build_feed(batch, now());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "payment-9");
        assert_eq!(feed[0].severity, Severity::Critical);
        assert!(feed[0].message.contains("is unknown"));
        assert_eq!(feed[0].action.as_ref().unwrap().label, "View order");
    }

    #[test]
    fn test_truncates_to_three_newest() {
        let batch = SourceBatch {
            appointments: vec![
                appointment(1, "2024-01-02T08:00"),
                appointment(2, "2024-01-02T11:00"),
                appointment(3, "2024-01-02T09:00"),
            ],
            waiting_room: vec![waiting(7, Some("2024-01-02T10:30"))],
            payments: vec![],
        };

        let feed = build_feed(batch, now());
        let ids: Vec<&str> = feed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["appointment-2", "waiting_room-7", "appointment-3"]);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let batch = SourceBatch {
            appointments: vec![appointment(1, "2024-01-02T10:00")],
            waiting_room: vec![waiting(2, Some("2024-01-02T10:00"))],
            payments: vec![],
        };
        let feed = build_feed(batch, now());
        assert_eq!(feed[0].id, "appointment-1");
        assert_eq!(feed[1].id, "waiting_room-2");
    }

    #[test]
    fn test_untimed_records_sort_last() {
        let batch = SourceBatch {
            appointments: vec![appointment(1, "2024-01-02T07:00")],
            waiting_room: vec![waiting(2, None), waiting(3, Some("not a date"))],
            payments: vec![],
        };
        let feed = build_feed(batch, now());
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].id, "appointment-1");
        assert!(feed[1].timestamp.is_none());
        assert!(feed[2].timestamp.is_none());
    }

    #[test]
    fn test_custom_limit() {
        let batch = SourceBatch {
            appointments: (1..=6)
                .map(|i| appointment(i, &format!("2024-01-02T0{}:00", i)))
                .collect(),
            waiting_room: vec![],
            payments: vec![],
        };
        assert_eq!(build_feed_with_limit(batch.clone(), now(), 5).len(), 5);
        // A zero limit still shows one entry.
        assert_eq!(build_feed_with_limit(batch, now(), 0).len(), 1);
    }
}
