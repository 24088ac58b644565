use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use clinicdesk_core::cache::{CacheTag, Mutation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Body of `POST /cache/invalidate`: a mutation name, explicit tags, or both.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InvalidateRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "payment_changed")]
    pub mutation: Option<Mutation>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub tags: Vec<CacheTag>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateResponse {
    #[schema(value_type = Vec<String>)]
    pub tags: Vec<CacheTag>,
    /// Number of refresh callbacks that were triggered
    pub refreshed: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/cache/invalidate",
    request_body = InvalidateRequest,
    responses(
        (status = 200, body = InvalidateResponse),
        (status = 400, description = "Neither mutation nor tags given")
    )
)]
pub async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InvalidateRequest>,
) -> ApiResult<Json<InvalidateResponse>> {
    let mut tags = body.tags;
    if let Some(mutation) = body.mutation {
        tags.extend_from_slice(mutation.affected_tags());
    }
    tags.sort();
    tags.dedup();
    if tags.is_empty() {
        return Err(ApiError::BadRequest(
            "Expected a `mutation` or a non-empty `tags` list".to_string(),
        ));
    }

    let refreshed = state.tag_cache.invalidate(&tags);
    tracing::info!("Invalidated {:?}, {} refresh(es) triggered", tags, refreshed);
    Ok(Json(InvalidateResponse { tags, refreshed }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/cache/invalidate", post(invalidate_cache))
}
