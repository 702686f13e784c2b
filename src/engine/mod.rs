pub mod aggregator;
pub mod locations;

pub use aggregator::Aggregator;
pub use locations::{collect_locations, LocationPoint, LocationSource};
