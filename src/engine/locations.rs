use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CoordinateSample, Coordinates, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Event,
    Sample,
}

/// A point plotted on the map views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPoint {
    pub lat: f64,
    pub lon: f64,
    pub source: LocationSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Events with parseable coordinates followed by coordinate-log samples.
/// With `only_day` set, events without a parseable timestamp are dropped.
pub fn collect_locations(
    events: &[Event],
    samples: &[CoordinateSample],
    only_day: Option<NaiveDate>,
) -> Vec<LocationPoint> {
    let on_day = |date: Option<NaiveDate>| match only_day {
        Some(day) => date == Some(day),
        None => true,
    };

    let from_events = events.iter().filter_map(|event| {
        if !on_day(event.recorded_at().map(|at| at.date())) {
            return None;
        }
        let coords = Coordinates::parse(&event.coordinates).ok()?;
        Some(LocationPoint {
            lat: coords.lat,
            lon: coords.lon,
            source: LocationSource::Event,
            ad_id: Some(event.ad_id.clone()),
            interaction_type: Some(event.interaction_type.clone()),
            timestamp: Some(event.timestamp.clone()),
        })
    });

    let from_samples = samples
        .iter()
        .filter(|sample| on_day(Some(sample.date)))
        .map(|sample| LocationPoint {
            lat: sample.lat,
            lon: sample.lon,
            source: LocationSource::Sample,
            ad_id: None,
            interaction_type: None,
            timestamp: Some(sample.date.to_string()),
        });

    from_events.chain(from_samples).collect()
}
