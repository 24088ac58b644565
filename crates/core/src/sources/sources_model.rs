use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::decimal_serde::lenient_optional_decimal;
use crate::utils::time_utils::parse_optional_timestamp;

// =============================================================================
// Patient reference
// =============================================================================

/// Patient as embedded in a source record.
///
/// Endpoints disagree on the shape: some send the display name, some the
/// primary key, some a nested object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PatientRef {
    Name(String),
    Id(i64),
    Detail(PatientDetail),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PatientDetail {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

pub(crate) const UNKNOWN_PATIENT: &str = "Unknown patient";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl PatientRef {
    /// Best available display name for the patient.
    pub fn display_name(&self) -> String {
        match self {
            PatientRef::Name(name) => non_blank(Some(name))
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
            PatientRef::Id(id) => format!("Patient #{}", id),
            PatientRef::Detail(detail) => {
                if let Some(full) = non_blank(detail.full_name.as_deref()) {
                    return full.to_string();
                }
                let parts: Vec<&str> = [detail.first_name.as_deref(), detail.last_name.as_deref()]
                    .into_iter()
                    .filter_map(non_blank)
                    .collect();
                if !parts.is_empty() {
                    return parts.join(" ");
                }
                match detail.id {
                    Some(id) => format!("Patient #{}", id),
                    None => UNKNOWN_PATIENT.to_string(),
                }
            }
        }
    }
}

pub(crate) fn actor_name(patient: Option<&PatientRef>) -> String {
    patient
        .map(PatientRef::display_name)
        .unwrap_or_else(|| UNKNOWN_PATIENT.to_string())
}

// =============================================================================
// Source records
// =============================================================================

/// Appointment scheduled for today (`GET /appointments/today`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppointmentSummary {
    pub id: i64,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default, alias = "date")]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl AppointmentSummary {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_optional_timestamp(self.appointment_date.as_deref())
    }
}

/// Entry in today's waiting room (`GET /waiting-room/today`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaitingRoomEntry {
    pub id: i64,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default, alias = "timestamp")]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub appointment: Option<i64>,
}

impl WaitingRoomEntry {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_optional_timestamp(self.arrival_time.as_deref())
    }
}

/// Recent payment (`GET /payments/recent`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentSummary {
    pub id: i64,
    #[serde(default)]
    pub charge_order: Option<i64>,
    /// Raw status; `null` and absent both read as empty ("unknown").
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_optional_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default)]
    pub received_at: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl PaymentSummary {
    /// When the payment was received, else the date of the appointment it pays.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_optional_timestamp(self.received_at.as_deref())
            .or_else(|| parse_optional_timestamp(self.appointment_date.as_deref()))
    }

    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::parse(&self.status)
    }
}

/// Payment status as far as the feed cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Confirmed,
    Pending,
    Other(String),
}

impl PaymentStatus {
    /// Case-insensitive, whitespace-tolerant parse.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "confirmed" => PaymentStatus::Confirmed,
            "pending" => PaymentStatus::Pending,
            _ => PaymentStatus::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Other(s) if s.is_empty() => "unknown",
            PaymentStatus::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The origin a record was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Appointments,
    WaitingRoom,
    Payments,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Appointments => "appointments",
            SourceKind::WaitingRoom => "waiting_room",
            SourceKind::Payments => "payments",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record from any of the three activity sources.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Appointment(AppointmentSummary),
    WaitingRoom(WaitingRoomEntry),
    Payment(PaymentSummary),
}

impl SourceRecord {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceRecord::Appointment(_) => SourceKind::Appointments,
            SourceRecord::WaitingRoom(_) => SourceKind::WaitingRoom,
            SourceRecord::Payment(_) => SourceKind::Payments,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            SourceRecord::Appointment(a) => a.timestamp(),
            SourceRecord::WaitingRoom(w) => w.timestamp(),
            SourceRecord::Payment(p) => p.timestamp(),
        }
    }
}
