use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("coordinates are empty")]
    Empty,

    #[error("expected \"(lat, lon)\" or \"lat, lon\", got {0:?}")]
    Shape(String),

    #[error("invalid coordinate component {0:?}")]
    Number(String),

    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Accepts the parenthesized form `"(lat, lon)"` and the bare form
    /// `"lat, lon"`. Whitespace around either form and around each
    /// component is ignored.
    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoordinateError::Empty);
        }

        let inner = match trimmed.strip_prefix('(') {
            Some(rest) => rest
                .strip_suffix(')')
                .ok_or_else(|| CoordinateError::Shape(trimmed.to_string()))?,
            None => trimmed,
        };

        let mut parts = inner.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoordinateError::Shape(trimmed.to_string()));
        };

        Self::new(parse_component(lat)?, parse_component(lon)?)
    }
}

fn parse_component(raw: &str) -> Result<f64, CoordinateError> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CoordinateError::Number(raw.to_string()))
}

impl FromStr for Coordinates {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// One externally submitted location, kept in the coordinate log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSample {
    pub lat: f64,
    pub lon: f64,
    pub date: NaiveDate,
}
