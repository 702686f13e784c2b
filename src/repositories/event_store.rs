use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::Event;

/// Append-only, ordered log of events.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append(&self, event: &Event) -> Result<(), StoreError>;

    /// All events in append order. A missing or unparseable log reads as
    /// empty.
    async fn read_all(&self) -> Result<Vec<Event>, StoreError>;
}

/// Keeps the whole log as one JSON array and rewrites it on every append.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Event>, StoreError> {
        match fs::read(&self.path).await {
            Ok(content) => Ok(decode_events(&content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Event store {} does not exist yet", self.path.display());
                Ok(Vec::new())
            }
            Err(err) => Err(StoreError::io(&self.path, err)),
        }
    }

    async fn write(&self, events: &[Event]) -> Result<(), StoreError> {
        let document = serde_json::to_vec_pretty(events)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StoreError::io(parent, err))?;
            }
        }

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, document)
            .await
            .map_err(|err| StoreError::io(&staging, err))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;

        Ok(())
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn append(&self, event: &Event) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut events = self.load().await?;
        events.push(event.clone());
        self.write(&events).await?;

        debug!(
            "Appended event for ad '{}' ({} total)",
            event.ad_id,
            events.len()
        );
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Event>, StoreError> {
        self.load().await
    }
}

/// Decodes a stored document. A single object is read as a one-element log;
/// elements that are not objects are skipped.
pub(crate) fn decode_events(content: &[u8]) -> Vec<Event> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    let document: Value = match serde_json::from_slice(content) {
        Ok(document) => document,
        Err(err) => {
            warn!("Event store is not valid JSON, reading it as empty: {}", err);
            return Vec::new();
        }
    };

    let records = match document {
        Value::Array(records) => records,
        record @ Value::Object(_) => vec![record],
        _ => {
            warn!("Event store does not hold a list of records, reading it as empty");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if !record.is_object() {
                warn!("Skipping event record {}: not an object", index);
                return None;
            }
            match serde_json::from_value::<Event>(record) {
                Ok(event) => Some(event),
                Err(err) => {
                    warn!("Skipping event record {}: {}", index, err);
                    None
                }
            }
        })
        .collect()
}

/// Event log held in memory, lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append(&self, event: &Event) -> Result<(), StoreError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.events.read().await.clone())
    }
}
