use std::sync::Arc;

use super::sources_model::{
    AppointmentSummary, PaymentSummary, SourceKind, SourceRecord, WaitingRoomEntry,
};
use super::sources_traits::ClinicActivitySource;
use crate::errors::Result;

/// Records gathered from the three sources in one refresh pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    pub appointments: Vec<AppointmentSummary>,
    pub waiting_room: Vec<WaitingRoomEntry>,
    pub payments: Vec<PaymentSummary>,
}

impl SourceBatch {
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.waiting_room.is_empty() && self.payments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.appointments.len() + self.waiting_room.len() + self.payments.len()
    }

    /// Flattens the batch in source order: appointments, waiting room, payments.
    pub fn into_records(self) -> Vec<SourceRecord> {
        let mut records = Vec::with_capacity(self.len());
        records.extend(self.appointments.into_iter().map(SourceRecord::Appointment));
        records.extend(self.waiting_room.into_iter().map(SourceRecord::WaitingRoom));
        records.extend(self.payments.into_iter().map(SourceRecord::Payment));
        records
    }
}

/// Failure-isolated wrappers around a [`ClinicActivitySource`].
///
/// Each fetch degrades to an empty list on error so one failing endpoint
/// never empties or blocks the others.
#[derive(Clone)]
pub struct SourceFetchers {
    source: Arc<dyn ClinicActivitySource>,
}

impl SourceFetchers {
    pub fn new(source: Arc<dyn ClinicActivitySource>) -> Self {
        Self { source }
    }

    pub async fn fetch_appointments_today(&self) -> Vec<AppointmentSummary> {
        or_empty(SourceKind::Appointments, self.source.appointments_today().await)
    }

    pub async fn fetch_waiting_room_today(&self) -> Vec<WaitingRoomEntry> {
        or_empty(SourceKind::WaitingRoom, self.source.waiting_room_today().await)
    }

    pub async fn fetch_payments_recent(&self) -> Vec<PaymentSummary> {
        or_empty(SourceKind::Payments, self.source.recent_payments().await)
    }

    /// Fetches all three sources concurrently.
    pub async fn fetch_all(&self) -> SourceBatch {
        let (appointments, waiting_room, payments) = futures::join!(
            self.fetch_appointments_today(),
            self.fetch_waiting_room_today(),
            self.fetch_payments_recent()
        );
        SourceBatch {
            appointments,
            waiting_room,
            payments,
        }
    }
}

fn or_empty<T>(kind: SourceKind, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Failed to fetch {} (using empty list): {}", kind, e);
            Vec::new()
        }
    }
}
