use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use clinicdesk_core::{dashboard::DashboardView, rates::RateQuote};

use super::snapshot_or_load;
use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard view model with local-currency amounts"),
        (status = 502, description = "Backend summary unavailable")
    )
)]
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardView>> {
    let service = state.dashboard_service.clone();
    let view = snapshot_or_load(&state.snapshots.dashboard, || async move {
        Ok(service.refresh().await?)
    })
    .await?;
    Ok(Json(view.as_ref().clone()))
}

/// Current BCV rate; `isFallback` is set when the live quote is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/bcv-rate",
    responses((status = 200, description = "BCV conversion rate"))
)]
pub async fn get_bcv_rate(State(state): State<Arc<AppState>>) -> ApiResult<Json<RateQuote>> {
    let resolver = state.rate_resolver.clone();
    let quote = snapshot_or_load(&state.snapshots.rate, || async move {
        Ok(resolver.get_rate().await)
    })
    .await?;
    Ok(Json(quote.as_ref().clone()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/bcv-rate", get(get_bcv_rate))
}
