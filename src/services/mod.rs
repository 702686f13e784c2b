pub mod ingestion;
pub mod update_stream;

pub use ingestion::{IngestOutcome, IngestionService};
pub use update_stream::{StreamUpdate, UpdateSubscription};
