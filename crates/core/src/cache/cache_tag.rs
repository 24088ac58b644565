use serde::{Deserialize, Serialize};

/// Cached query families that can be invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheTag {
    Appointments,
    WaitingRoom,
    Payments,
    Patients,
    Dashboard,
    Notifications,
    Rate,
}

impl CacheTag {
    pub const ALL: [CacheTag; 7] = [
        CacheTag::Appointments,
        CacheTag::WaitingRoom,
        CacheTag::Payments,
        CacheTag::Patients,
        CacheTag::Dashboard,
        CacheTag::Notifications,
        CacheTag::Rate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::Appointments => "appointments",
            CacheTag::WaitingRoom => "waiting_room",
            CacheTag::Payments => "payments",
            CacheTag::Patients => "patients",
            CacheTag::Dashboard => "dashboard",
            CacheTag::Notifications => "notifications",
            CacheTag::Rate => "rate",
        }
    }
}

impl std::fmt::Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed write against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    AppointmentChanged,
    WaitingRoomChanged,
    PaymentChanged,
    PatientChanged,
    RateChanged,
}

impl Mutation {
    /// Tags whose cached data is stale after this mutation.
    pub fn affected_tags(&self) -> &'static [CacheTag] {
        match self {
            Mutation::AppointmentChanged => &[
                CacheTag::Appointments,
                CacheTag::Dashboard,
                CacheTag::Notifications,
            ],
            Mutation::WaitingRoomChanged => &[
                CacheTag::WaitingRoom,
                CacheTag::Dashboard,
                CacheTag::Notifications,
            ],
            Mutation::PaymentChanged => &[
                CacheTag::Payments,
                CacheTag::Dashboard,
                CacheTag::Notifications,
            ],
            Mutation::PatientChanged => &[CacheTag::Patients, CacheTag::Dashboard],
            Mutation::RateChanged => &[CacheTag::Rate, CacheTag::Dashboard],
        }
    }
}
