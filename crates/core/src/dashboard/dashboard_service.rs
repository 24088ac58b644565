use std::sync::Arc;

use super::dashboard_composer::compose_summary;
use super::dashboard_model::DashboardView;
use super::dashboard_traits::DashboardSummarySource;
use crate::errors::Result;
use crate::rates::RateResolverTrait;

/// Fetches the summary payload and the BCV rate and composes the view.
#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn DashboardSummarySource>,
    rates: Arc<dyn RateResolverTrait>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DashboardSummarySource>, rates: Arc<dyn RateResolverTrait>) -> Self {
        Self { source, rates }
    }

    /// The rate never fails; a summary failure is returned to the caller,
    /// which keeps showing the previous view.
    pub async fn refresh(&self) -> Result<DashboardView> {
        let (summary, rate) = futures::join!(self.source.dashboard_summary(), self.rates.get_rate());
        let summary = summary?;
        Ok(compose_summary(summary).with_rate(&rate))
    }
}
