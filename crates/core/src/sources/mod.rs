//! Activity sources - wire records, source trait and isolated fetchers.

mod source_fetchers;
mod sources_model;
mod sources_traits;

pub use source_fetchers::{SourceBatch, SourceFetchers};
pub use sources_model::{
    AppointmentSummary, PatientDetail, PatientRef, PaymentStatus, PaymentSummary, SourceKind,
    SourceRecord, WaitingRoomEntry,
};
pub use sources_traits::ClinicActivitySource;

pub(crate) use sources_model::actor_name;
