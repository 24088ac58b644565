use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use clinicdesk_core::{
    notifications::NotificationEvent,
    sources::{AppointmentSummary, WaitingRoomEntry},
};

use super::snapshot_or_load;
use crate::{error::ApiResult, main_lib::AppState};

/// Latest notification feed (at most three entries, never empty).
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses((status = 200, description = "Notification feed, newest first"))
)]
pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<NotificationEvent>>> {
    let service = state.notification_service.clone();
    let feed = snapshot_or_load(&state.snapshots.notifications, || async move {
        Ok(service.latest().await)
    })
    .await?;
    Ok(Json(feed.as_ref().clone()))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/today",
    responses((status = 200, description = "Today's appointments"))
)]
pub async fn get_appointments_today(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AppointmentSummary>>> {
    let fetchers = state.fetchers.clone();
    let appointments = snapshot_or_load(&state.snapshots.appointments, || async move {
        Ok(fetchers.fetch_appointments_today().await)
    })
    .await?;
    Ok(Json(appointments.as_ref().clone()))
}

#[utoipa::path(
    get,
    path = "/api/v1/waiting-room/today",
    responses((status = 200, description = "Today's waiting room entries"))
)]
pub async fn get_waiting_room_today(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WaitingRoomEntry>>> {
    let fetchers = state.fetchers.clone();
    let entries = snapshot_or_load(&state.snapshots.waiting_room, || async move {
        Ok(fetchers.fetch_waiting_room_today().await)
    })
    .await?;
    Ok(Json(entries.as_ref().clone()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(get_notifications))
        .route("/appointments/today", get(get_appointments_today))
        .route("/waiting-room/today", get(get_waiting_room_today))
}
