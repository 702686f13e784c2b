use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::config::CoordinateMode;
use crate::engine::Aggregator;
use crate::error::StoreError;
use crate::models::{AggregateBundle, CreateEvent, Event, RateTable};
use crate::repositories::EventStore;

/// The stored event together with the aggregates recomputed after storing it.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub event: Event,
    pub summary: AggregateBundle,
}

#[derive(Clone)]
pub struct IngestionService {
    store: Arc<dyn EventStore>,
    rates: Arc<RateTable>,
    coordinate_mode: CoordinateMode,
    aggregator: Aggregator,
}

impl IngestionService {
    pub fn new(
        store: Arc<dyn EventStore>,
        rates: RateTable,
        coordinate_mode: CoordinateMode,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            store,
            rates: Arc::new(rates),
            coordinate_mode,
            aggregator,
        }
    }

    pub async fn ingest(&self, request: CreateEvent) -> Result<IngestOutcome, StoreError> {
        self.ingest_at(request, Local::now().naive_local()).await
    }

    pub async fn ingest_at(
        &self,
        request: CreateEvent,
        now: NaiveDateTime,
    ) -> Result<IngestOutcome, StoreError> {
        let earnings = self.rates.lookup(&request.interaction_type);
        let coordinates = self.coordinate_mode.resolve(request.coordinates.as_deref());

        let event = Event::new(
            coordinates,
            request.interaction_type,
            request.ad_id,
            earnings,
            now,
        );

        self.store.append(&event).await?;
        info!(
            "Stored {} interaction for ad '{}' earning {:.2}",
            event.interaction_type, event.ad_id, earnings
        );

        let events = self.store.read_all().await?;
        let summary = self.aggregator.summarize(&events, now.date());
        debug!(
            "Recomputed aggregates: {} interactions across {} ads",
            summary.total_interactions,
            summary.table.len()
        );

        Ok(IngestOutcome { event, summary })
    }

    /// Aggregates over the current log, with "today" taken from the local
    /// clock.
    pub async fn summary(&self) -> Result<AggregateBundle, StoreError> {
        let events = self.store.read_all().await?;
        Ok(self
            .aggregator
            .summarize(&events, Local::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use crate::repositories::MemoryStore;
    use chrono::{Duration, NaiveDate};

    fn service(mode: CoordinateMode) -> (IngestionService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = IngestionService::new(
            store.clone(),
            RateTable::default(),
            mode,
            Aggregator::default(),
        );
        (service, store)
    }

    fn request(kind: &str, ad_id: &str) -> CreateEvent {
        CreateEvent {
            coordinates: Some("(52.52, 13.405)".to_string()),
            interaction_type: kind.to_string(),
            ad_id: ad_id.to_string(),
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_assigns_rate_and_timestamp() {
        let (service, store) = service(CoordinateMode::FromRequest);

        let outcome = service.ingest_at(request("qr", "A1"), noon()).await.unwrap();

        assert_eq!(outcome.event.earnings, Some(1.00));
        assert_eq!(outcome.event.timestamp, "2024-08-01T12:00:00.000000");
        assert_eq!(outcome.event.coordinates, "(52.52, 13.405)");
        assert_eq!(store.read_all().await.unwrap(), vec![outcome.event.clone()]);
    }

    #[tokio::test]
    async fn test_unknown_type_earns_fallback() {
        let (service, _) = service(CoordinateMode::FromRequest);

        let outcome = service.ingest_at(request("TAP", "A1"), noon()).await.unwrap();

        assert_eq!(outcome.event.earnings, Some(0.20));
    }

    #[tokio::test]
    async fn test_swipe_then_qr_scenario() {
        let (service, _) = service(CoordinateMode::FromRequest);

        service
            .ingest_at(request("SWIPE_UP", "A1"), noon())
            .await
            .unwrap();
        let outcome = service.ingest_at(request("qr", "A1"), noon()).await.unwrap();

        let table = &outcome.summary.table;
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].ad_id, "A1");
        assert_eq!(table[0].interactions, 2);
        assert!((table[0].earnings - 1.05).abs() < 1e-9);
        assert_eq!(outcome.summary.total_interactions, 2);
        assert_eq!(outcome.summary.interactions_today, 2);
    }

    #[tokio::test]
    async fn test_total_tracks_every_append() {
        let (service, _) = service(CoordinateMode::FromRequest);

        for n in 1..=7u64 {
            let outcome = service
                .ingest_at(request("SWIPE_DOWN", &format!("ad-{}", n % 3)), noon())
                .await
                .unwrap();
            assert_eq!(outcome.summary.total_interactions, n);
        }
    }

    #[tokio::test]
    async fn test_fixed_location_overrides_request() {
        let fixed = Coordinates::new(48.8566, 2.3522).unwrap();
        let (service, _) = service(CoordinateMode::Fixed(fixed));

        let outcome = service.ingest_at(request("qr", "A1"), noon()).await.unwrap();

        assert_eq!(outcome.event.coordinates, "(48.8566, 2.3522)");
    }

    #[tokio::test]
    async fn test_summary_counts_today_from_clock() {
        let now = Local::now().naive_local();
        let (service, store) = service(CoordinateMode::FromRequest);
        for at in [now, now, now - Duration::days(1)] {
            store
                .append(&Event::new(
                    String::new(),
                    "qr".to_string(),
                    "A1".to_string(),
                    1.0,
                    at,
                ))
                .await
                .unwrap();
        }

        let summary = service.summary().await.unwrap();

        assert_eq!(summary.total_interactions, 3);
        assert_eq!(summary.interactions_today, 2);
    }
}
