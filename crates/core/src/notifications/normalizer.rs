//! Per-source mapping from activity records to feed entries.
//!
//! Every function here is pure: the same record always yields the same event.

use super::notification_model::{EntityKind, NotificationAction, NotificationEvent, Severity};
use crate::sources::{
    AppointmentSummary, PaymentStatus, PaymentSummary, SourceRecord, WaitingRoomEntry,
};
use crate::sources::actor_name;

pub fn normalize_appointment(appointment: &AppointmentSummary) -> NotificationEvent {
    let actor = actor_name(appointment.patient.as_ref());
    let entity_id = appointment.id.to_string();
    NotificationEvent {
        id: NotificationEvent::make_id(EntityKind::Appointment, &entity_id),
        timestamp: appointment.timestamp(),
        message: format!("New appointment created for {}", actor),
        actor,
        entity: EntityKind::Appointment,
        severity: Severity::Info,
        action: Some(NotificationAction::new(
            format!("/appointments/{}", appointment.id),
            "View appointment",
        )),
        entity_id,
    }
}

pub fn normalize_waiting_room(entry: &WaitingRoomEntry) -> NotificationEvent {
    let actor = actor_name(entry.patient.as_ref());
    let entity_id = entry.id.to_string();
    NotificationEvent {
        id: NotificationEvent::make_id(EntityKind::WaitingRoom, &entity_id),
        timestamp: entry.timestamp(),
        message: format!("{} entered the waiting room", actor),
        actor,
        entity: EntityKind::WaitingRoom,
        severity: Severity::Success,
        action: Some(NotificationAction::new(
            format!("/waiting-room/{}", entry.id),
            "View waiting room",
        )),
        entity_id,
    }
}

/// Severity of a payment entry: confirmed → success, pending → warning,
/// anything else → critical.
pub fn payment_severity(status: &PaymentStatus) -> Severity {
    match status {
        PaymentStatus::Confirmed => Severity::Success,
        PaymentStatus::Pending => Severity::Warning,
        PaymentStatus::Other(_) => Severity::Critical,
    }
}

pub fn normalize_payment(payment: &PaymentSummary) -> NotificationEvent {
    let actor = actor_name(payment.patient.as_ref());
    let entity_id = payment.id.to_string();
    let status = payment.payment_status();

    let order = payment
        .charge_order
        .map(|id| format!("#{}", id))
        .unwrap_or_else(|| "(no order)".to_string());
    let amount = payment
        .amount
        .map(|a| format!("{:.2}", a))
        .unwrap_or_else(|| "-".to_string());
    let currency = payment.currency.as_deref().unwrap_or("");
    let method = payment.method.as_deref().unwrap_or("unspecified method");

    let message = format!(
        "Payment #{} for order {} is {}: {} {} via {}",
        payment.id,
        order,
        status,
        amount,
        currency,
        method
    )
    .replace("  ", " ");

    let label = if status == PaymentStatus::Pending {
        "Register Payment"
    } else {
        "View order"
    };
    let href = match payment.charge_order {
        Some(order_id) => format!("/charge-orders/{}", order_id),
        None => "/charge-orders".to_string(),
    };

    NotificationEvent {
        id: NotificationEvent::make_id(EntityKind::Payment, &entity_id),
        timestamp: payment.timestamp(),
        actor,
        entity: EntityKind::Payment,
        entity_id,
        message,
        severity: payment_severity(&status),
        action: Some(NotificationAction::new(href, label)),
    }
}

pub fn normalize(record: &SourceRecord) -> NotificationEvent {
    match record {
        SourceRecord::Appointment(a) => normalize_appointment(a),
        SourceRecord::WaitingRoom(w) => normalize_waiting_room(w),
        SourceRecord::Payment(p) => normalize_payment(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::PatientRef;
    use rust_decimal_macros::dec;

    fn payment(status: &str) -> PaymentSummary {
        PaymentSummary {
            id: 9,
            charge_order: Some(5),
            status: status.to_string(),
            amount: Some(dec!(20)),
            currency: Some("USD".to_string()),
            method: Some("cash".to_string()),
            patient: Some(PatientRef::Name("Ana".to_string())),
            received_at: None,
            appointment_date: Some("2024-01-02T09:00".to_string()),
        }
    }

    #[test]
    fn test_appointment_event() {
        let event = normalize_appointment(&AppointmentSummary {
            id: 1,
            patient: Some(PatientRef::Name("Ana".to_string())),
            appointment_date: Some("2024-01-02T10:00".to_string()),
            status: Some("scheduled".to_string()),
        });
        assert_eq!(event.id, "appointment-1");
        assert_eq!(event.actor, "Ana");
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.message, "New appointment created for Ana");
        assert_eq!(event.action.unwrap().href, "/appointments/1");
    }

    #[test]
    fn test_waiting_room_event() {
        let event = normalize_waiting_room(&WaitingRoomEntry {
            id: 4,
            patient: None,
            arrival_time: Some("2024-01-02T08:45".to_string()),
            status: Some("waiting".to_string()),
            appointment: Some(1),
        });
        assert_eq!(event.severity, Severity::Success);
        assert_eq!(event.message, "Unknown patient entered the waiting room");
        assert_eq!(event.entity, EntityKind::WaitingRoom);
        assert_eq!(event.action.unwrap().href, "/waiting-room/4");
    }

    #[test]
    fn test_payment_severity_by_status() {
        assert_eq!(normalize_payment(&payment("confirmed")).severity, Severity::Success);
        assert_eq!(normalize_payment(&payment("pending")).severity, Severity::Warning);
        assert_eq!(normalize_payment(&payment("rejected")).severity, Severity::Critical);
        assert_eq!(normalize_payment(&payment("")).severity, Severity::Critical);
    }

    #[test]
    fn test_payment_message_and_action() {
        let pending = normalize_payment(&payment("pending"));
        assert_eq!(
            pending.message,
            "Payment #9 for order #5 is pending: 20.00 USD via cash"
        );
        let action = pending.action.unwrap();
        assert_eq!(action.href, "/charge-orders/5");
        assert_eq!(action.label, "Register Payment");

        let confirmed = normalize_payment(&payment("Confirmed"));
        assert_eq!(confirmed.action.unwrap().label, "View order");
    }

    #[test]
    fn test_payment_without_optional_fields() {
        let bare = PaymentSummary {
            id: 3,
            charge_order: None,
            status: "cancelled".to_string(),
            amount: None,
            currency: None,
            method: None,
            patient: None,
            received_at: None,
            appointment_date: None,
        };
        let event = normalize_payment(&bare);
        assert_eq!(event.timestamp, None);
        assert_eq!(event.action.unwrap().href, "/charge-orders");
        assert!(event.message.contains("cancelled"));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let record = SourceRecord::Payment(payment("pending"));
        assert_eq!(normalize(&record), normalize(&record));
    }
}
