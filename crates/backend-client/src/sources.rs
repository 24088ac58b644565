//! Core source trait implementations for [`ClinicBackendClient`].

use async_trait::async_trait;
use clinicdesk_core::dashboard::{DashboardSummary, DashboardSummarySource};
use clinicdesk_core::rates::{RateProvider, RateQuote};
use clinicdesk_core::sources::{
    AppointmentSummary, ClinicActivitySource, PaymentSummary, WaitingRoomEntry,
};
use clinicdesk_core::Result;

use crate::client::{endpoints, ClinicBackendClient};
use crate::errors::ClientError;

fn report(endpoint: &str, err: ClientError) -> clinicdesk_core::Error {
    if err.is_transient() {
        log::warn!("Backend {} unavailable: {}", endpoint, err);
    } else {
        log::error!("Backend {} failed: {}", endpoint, err);
    }
    err.into()
}

#[async_trait]
impl ClinicActivitySource for ClinicBackendClient {
    async fn appointments_today(&self) -> Result<Vec<AppointmentSummary>> {
        self.get_list(endpoints::APPOINTMENTS_TODAY)
            .await
            .map_err(|e| report(endpoints::APPOINTMENTS_TODAY, e))
    }

    async fn waiting_room_today(&self) -> Result<Vec<WaitingRoomEntry>> {
        self.get_list(endpoints::WAITING_ROOM_TODAY)
            .await
            .map_err(|e| report(endpoints::WAITING_ROOM_TODAY, e))
    }

    async fn recent_payments(&self) -> Result<Vec<PaymentSummary>> {
        self.get_list(endpoints::PAYMENTS_RECENT)
            .await
            .map_err(|e| report(endpoints::PAYMENTS_RECENT, e))
    }
}

#[async_trait]
impl DashboardSummarySource for ClinicBackendClient {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.get_object(endpoints::DASHBOARD_SUMMARY)
            .await
            .map_err(|e| report(endpoints::DASHBOARD_SUMMARY, e))
    }
}

#[async_trait]
impl RateProvider for ClinicBackendClient {
    async fn fetch_rate(&self) -> Result<RateQuote> {
        self.fetch_bcv_rate()
            .await
            .map_err(|e| report(endpoints::BCV_RATE, e))
    }
}
