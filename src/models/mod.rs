pub mod coordinates;
pub mod event;
pub mod rates;
pub mod summary;

pub use coordinates::{CoordinateError, CoordinateSample, Coordinates};
pub use event::{CreateEvent, Event};
pub use rates::{EarningsPolicy, RateTable};
pub use summary::{AdSummary, AggregateBundle};
