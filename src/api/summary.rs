use axum::{extract::State, Json};
use tracing::error;

use crate::api::response::ApiResult;
use crate::models::AggregateBundle;

use super::AppState;

pub async fn get_summary(State(state): State<AppState>) -> ApiResult<AggregateBundle> {
    match state.ingestion.summary().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            error!("Failed to compute summary: {}", e);
            Err(e.into())
        }
    }
}
