use async_trait::async_trait;

use super::dashboard_model::DashboardSummary;
use crate::errors::Result;

/// Source of the aggregate dashboard payload.
#[async_trait]
pub trait DashboardSummarySource: Send + Sync {
    async fn dashboard_summary(&self) -> Result<DashboardSummary>;
}
