use std::sync::Arc;
use std::time::Duration;

use crate::{config::Config, events::EventBus};
use clinicdesk_backend_client::{BackendConfig, ClinicBackendClient};
use clinicdesk_core::{
    cache::TagCache,
    dashboard::{DashboardService, DashboardView},
    notifications::{NotificationEvent, NotificationService},
    polling::LatestSnapshot,
    rates::{RateQuote, RateResolver, RateResolverTrait},
    sources::{AppointmentSummary, SourceFetchers, WaitingRoomEntry},
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const EVENT_BUS_CAPACITY: usize = 256;

/// Latest values produced by the refresh pollers.
#[derive(Clone, Default)]
pub struct Snapshots {
    pub notifications: LatestSnapshot<Vec<NotificationEvent>>,
    pub dashboard: LatestSnapshot<DashboardView>,
    pub rate: LatestSnapshot<RateQuote>,
    pub appointments: LatestSnapshot<Vec<AppointmentSummary>>,
    pub waiting_room: LatestSnapshot<Vec<WaitingRoomEntry>>,
}

pub struct AppState {
    pub fetchers: SourceFetchers,
    pub notification_service: Arc<NotificationService>,
    pub dashboard_service: Arc<DashboardService>,
    pub rate_resolver: Arc<dyn RateResolverTrait>,
    pub tag_cache: Arc<TagCache>,
    pub event_bus: EventBus,
    pub snapshots: Snapshots,
    pub fast_refresh: Duration,
    pub slow_refresh: Duration,
}

pub fn init_tracing() {
    let log_format = std::env::var("CD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let backend_config = BackendConfig::new(config.backend_url.clone())
        .with_token(config.api_token.clone())
        .with_timeout(config.backend_timeout)
        .with_rate_defaults(config.rate.clone());
    let client = Arc::new(ClinicBackendClient::new(backend_config)?);
    tracing::info!("Using clinic backend at {}", client.base_url());

    let fetchers = SourceFetchers::new(client.clone());
    let rate_resolver: Arc<dyn RateResolverTrait> =
        Arc::new(RateResolver::with_settings(client.clone(), config.rate.clone()));
    let notification_service = Arc::new(NotificationService::new(fetchers.clone()));
    let dashboard_service = Arc::new(DashboardService::new(client, rate_resolver.clone()));

    Ok(Arc::new(AppState {
        fetchers,
        notification_service,
        dashboard_service,
        rate_resolver,
        tag_cache: Arc::new(TagCache::new()),
        event_bus: EventBus::new(EVENT_BUS_CAPACITY),
        snapshots: Snapshots::default(),
        fast_refresh: config.fast_refresh,
        slow_refresh: config.slow_refresh,
    }))
}
