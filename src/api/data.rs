use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::response::{ApiError, ApiResult};
use crate::models::{AggregateBundle, CreateEvent, Event};

use super::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub received_data: Event,
    pub method_used: String,
    pub updated_data: AggregateBundle,
}

#[axum::debug_handler]
pub async fn ingest_event(
    State(state): State<AppState>,
    method: Method,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<IngestResponse> {
    let Json(body) = payload.map_err(|rejection| {
        warn!("Rejected event payload: {}", rejection.body_text());
        ApiError::bad_request("Invalid JSON")
    })?;

    let request = CreateEvent::from_json(body).map_err(|e| {
        warn!("Rejected event payload: {}", e);
        ApiError::bad_request("Invalid JSON")
    })?;

    info!(
        "Received {} interaction for ad '{}'",
        request.interaction_type, request.ad_id
    );

    let outcome = state.ingestion.ingest(request).await.map_err(|e| {
        error!("Failed to save event: {}", e);
        ApiError::internal("Failed to save event")
    })?;

    Ok(Json(IngestResponse {
        message: "Data received and saved successfully".to_string(),
        received_data: outcome.event,
        method_used: method.to_string(),
        updated_data: outcome.summary,
    }))
}
