mod activity;
mod cache;
mod dashboard;
mod health;
mod stream;

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use clinicdesk_core::polling::LatestSnapshot;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

pub use cache::{InvalidateRequest, InvalidateResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        activity::get_notifications,
        activity::get_appointments_today,
        activity::get_waiting_room_today,
        dashboard::get_dashboard,
        dashboard::get_bcv_rate,
        cache::invalidate_cache,
        stream::stream_events,
    ),
    components(schemas(InvalidateRequest, InvalidateResponse)),
    tags((name = "clinicdesk"))
)]
pub struct ApiDoc;

/// Returns the latest snapshot, loading and publishing one if no poll has
/// completed yet.
pub(crate) async fn snapshot_or_load<T, F, Fut>(
    slot: &LatestSnapshot<T>,
    load: F,
) -> ApiResult<Arc<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    if let Some(current) = slot.current() {
        return Ok(current);
    }
    let ticket = slot.begin();
    let value = load().await?;
    slot.publish(ticket, value);
    // A newer poll may have won the race; either way a value is now present.
    slot.current()
        .ok_or_else(|| ApiError::Internal("Snapshot unavailable".to_string()))
}

fn cors_layer(allow: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if allow.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins = allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    layer.allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = cors_layer(&config.cors_allow);
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(activity::router())
        .merge(dashboard::router())
        .merge(cache::router())
        .merge(stream::router());

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
