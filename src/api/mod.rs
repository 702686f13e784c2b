pub mod data;
pub mod events;
pub mod health;
pub mod locations;
pub mod response;
pub mod summary;
pub mod ui;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::Config;
use crate::engine::Aggregator;
use crate::repositories::{CoordinateLog, EventStore};
use crate::services::IngestionService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub coordinate_log: Arc<CoordinateLog>,
    pub ingestion: IngestionService,
    pub aggregator: Aggregator,
    pub stream_interval: Duration,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn EventStore>) -> Self {
        let aggregator = config.aggregator();
        let ingestion = IngestionService::new(
            store.clone(),
            config.rates.clone(),
            config.coordinate_mode,
            aggregator,
        );

        Self {
            store,
            coordinate_log: Arc::new(CoordinateLog::new(&config.coords_file)),
            ingestion,
            aggregator,
            stream_interval: config.stream_interval,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::dashboard_handler))
        .route("/map", get(ui::map_handler))
        .route("/map_today", get(ui::map_handler))
        .route("/send_data", get(ui::send_data_handler))
        .route("/health", get(health::health_check))
        .route("/api/data", post(data::ingest_event))
        .route("/api/events", get(events::stream_updates))
        .route("/api/summary", get(summary::get_summary))
        .route("/api/locations", get(locations::list_locations))
        .route("/api/coordinates", post(locations::record_coordinates))
        .with_state(state)
}
