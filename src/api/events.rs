use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, Sse},
};
use futures_util::Stream;
use tracing::{error, info};

use crate::services::update_stream;

use super::AppState;

/// Server-sent stream of aggregate snapshots, one `data: <json>` message per
/// tick. The polling task lives as long as the response body.
pub async fn stream_updates(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let mut subscription = update_stream::subscribe(
        state.store.clone(),
        state.aggregator,
        state.stream_interval,
    );
    info!(connection = %subscription.id(), "Update stream opened");

    let stream = async_stream::stream! {
        while let Some(update) = subscription.next().await {
            match serde_json::to_string(&update) {
                Ok(payload) => {
                    yield Ok::<SseEvent, Infallible>(SseEvent::default().data(payload));
                }
                Err(e) => {
                    error!(connection = %subscription.id(), "Failed to encode update: {}", e);
                    break;
                }
            }
        }
        info!(connection = %subscription.id(), "Update stream closed");
    };

    Sse::new(stream)
}
