use async_trait::async_trait;

use super::sources_model::{AppointmentSummary, PaymentSummary, WaitingRoomEntry};
use crate::errors::Result;

/// Read access to the three activity endpoints of the clinic backend.
#[async_trait]
pub trait ClinicActivitySource: Send + Sync {
    async fn appointments_today(&self) -> Result<Vec<AppointmentSummary>>;
    async fn waiting_room_today(&self) -> Result<Vec<WaitingRoomEntry>>;
    async fn recent_payments(&self) -> Result<Vec<PaymentSummary>>;
}
