use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error};
use uuid::Uuid;

use crate::engine::Aggregator;
use crate::models::event::TIMESTAMP_FORMAT;
use crate::models::{AggregateBundle, Event};
use crate::repositories::EventStore;

/// One message pushed to a stream subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamUpdate {
    #[serde(flatten)]
    pub summary: AggregateBundle,

    pub data_updated: bool,

    pub timestamp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_coords: Option<String>,
}

/// Remembers the total seen on the previous tick of one connection.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    previous_total: Option<u64>,
}

impl ChangeTracker {
    /// True when `total` differs from the previous observation. The first
    /// observation always counts as a change.
    pub fn observe(&mut self, total: u64) -> bool {
        let changed = self.previous_total != Some(total);
        self.previous_total = Some(total);
        changed
    }
}

pub fn build_update(
    aggregator: &Aggregator,
    events: &[Event],
    now: NaiveDateTime,
    tracker: &mut ChangeTracker,
) -> StreamUpdate {
    let summary = aggregator.summarize(events, now.date());
    let data_updated = tracker.observe(summary.total_interactions);
    let latest_coords = events
        .last()
        .map(|event| event.coordinates.clone())
        .filter(|coords| !coords.is_empty());

    StreamUpdate {
        summary,
        data_updated,
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        latest_coords,
    }
}

/// A running per-connection polling task. Dropping the subscription stops
/// the task.
pub struct UpdateSubscription {
    id: Uuid,
    receiver: mpsc::Receiver<StreamUpdate>,
    task: JoinHandle<()>,
}

impl UpdateSubscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next update, or `None` once the task has stopped.
    pub async fn next(&mut self) -> Option<StreamUpdate> {
        self.receiver.recv().await
    }
}

impl Drop for UpdateSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn subscribe(
    store: Arc<dyn EventStore>,
    aggregator: Aggregator,
    period: Duration,
) -> UpdateSubscription {
    let id = Uuid::new_v4();
    let (sender, receiver) = mpsc::channel(1);
    let task = tokio::spawn(poll(id, store, aggregator, period, sender));

    UpdateSubscription { id, receiver, task }
}

async fn poll(
    id: Uuid,
    store: Arc<dyn EventStore>,
    aggregator: Aggregator,
    period: Duration,
    sender: mpsc::Sender<StreamUpdate>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tracker = ChangeTracker::default();

    loop {
        ticker.tick().await;

        let events = match store.read_all().await {
            Ok(events) => events,
            Err(err) => {
                error!(connection = %id, "Update stream stopped: {}", err);
                return;
            }
        };

        let update = build_update(&aggregator, &events, Local::now().naive_local(), &mut tracker);
        if update.data_updated {
            debug!(
                connection = %id,
                "Total interactions now {}", update.summary.total_interactions
            );
        }

        if sender.send(update).await.is_err() {
            debug!(connection = %id, "Subscriber went away");
            return;
        }
    }
}
