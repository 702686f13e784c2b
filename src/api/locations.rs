use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::api::response::{ApiError, ApiResult};
use crate::engine::{collect_locations, LocationPoint};
use crate::models::{CoordinateSample, Coordinates};

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    today: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordCoordinates {
    pub lat: f64,
    pub lon: f64,
}

pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Vec<LocationPoint>> {
    let events = state.store.read_all().await.map_err(|e| {
        error!("Failed to read events for map: {}", e);
        ApiError::from(e)
    })?;

    let samples = match state.coordinate_log.read_all().await {
        Ok(samples) => samples,
        Err(e) => {
            warn!("Coordinate log unavailable, plotting events only: {}", e);
            Vec::new()
        }
    };

    let only_day = query.today.then(|| Local::now().date_naive());
    Ok(Json(collect_locations(&events, &samples, only_day)))
}

pub async fn record_coordinates(
    State(state): State<AppState>,
    payload: Result<Json<RecordCoordinates>, JsonRejection>,
) -> Result<(StatusCode, Json<CoordinateSample>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!("Rejected coordinate sample: {}", rejection.body_text());
        ApiError::bad_request("Invalid JSON")
    })?;

    let coords = Coordinates::new(body.lat, body.lon)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let sample = CoordinateSample {
        lat: coords.lat,
        lon: coords.lon,
        date: Local::now().date_naive(),
    };

    state.coordinate_log.append(&sample).await.map_err(|e| {
        error!("Failed to record coordinate sample: {}", e);
        ApiError::internal("Failed to record coordinates")
    })?;

    info!("Recorded coordinate sample {}", coords);
    Ok((StatusCode::CREATED, Json(sample)))
}
