use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::Aggregator;
use crate::error::ConfigError;
use crate::models::rates::{DEFAULT_FALLBACK_RATE, DEFAULT_RATES};
use crate::models::{Coordinates, CoordinateError, EarningsPolicy, RateTable};

pub const DEFAULT_STREAM_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

/// Where an ingested event's coordinates come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateMode {
    FromRequest,
    Fixed(Coordinates),
}

impl CoordinateMode {
    /// Coordinates to store for an event. Request values are kept as sent;
    /// unparseable ones are logged.
    pub fn resolve(&self, requested: Option<&str>) -> String {
        match self {
            CoordinateMode::Fixed(location) => location.to_string(),
            CoordinateMode::FromRequest => {
                let Some(raw) = requested else {
                    return String::new();
                };
                match Coordinates::parse(raw) {
                    Ok(_) => raw.to_string(),
                    Err(CoordinateError::Empty) => String::new(),
                    Err(err) => {
                        warn!("Keeping unparseable coordinates {:?}: {}", raw, err);
                        raw.to_string()
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub data_file: PathBuf,
    pub coords_file: PathBuf,
    pub earnings_policy: EarningsPolicy,
    pub rates: RateTable,
    pub coordinate_mode: CoordinateMode,
    pub stream_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            store_backend: StoreBackend::File,
            data_file: PathBuf::from("data.json"),
            coords_file: PathBuf::from("coordinates.csv"),
            earnings_policy: EarningsPolicy::PerType,
            rates: RateTable::default(),
            coordinate_mode: CoordinateMode::FromRequest,
            stream_interval: Duration::from_millis(DEFAULT_STREAM_INTERVAL_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = var("HOST").unwrap_or(defaults.host);

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|err| ConfigError::new("PORT", &raw, err))?,
            None => defaults.port,
        };

        let store_backend = match var("STORE_BACKEND") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "file" => StoreBackend::File,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::new(
                        "STORE_BACKEND",
                        &raw,
                        "expected \"file\" or \"memory\"",
                    ))
                }
            },
            None => defaults.store_backend,
        };

        let data_file = var("DATA_FILE").map(PathBuf::from).unwrap_or(defaults.data_file);
        let coords_file = var("COORDS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.coords_file);

        let fallback = match var("FALLBACK_RATE") {
            Some(raw) => parse_rate("FALLBACK_RATE", &raw)?,
            None => DEFAULT_FALLBACK_RATE,
        };

        let rates = match var("RATE_TABLE") {
            Some(raw) => RateTable::new(parse_rate_table(&raw)?, fallback),
            None => {
                let defaults = DEFAULT_RATES
                    .iter()
                    .map(|(kind, rate)| (kind.to_string(), *rate))
                    .collect();
                RateTable::new(defaults, fallback)
            }
        };

        let earnings_policy = match var("EARNINGS_POLICY") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "per_type" => EarningsPolicy::PerType,
                "flat" => {
                    let rate = match var("FLAT_RATE") {
                        Some(raw) => parse_rate("FLAT_RATE", &raw)?,
                        None => DEFAULT_FALLBACK_RATE,
                    };
                    EarningsPolicy::Flat { rate }
                }
                _ => {
                    return Err(ConfigError::new(
                        "EARNINGS_POLICY",
                        &raw,
                        "expected \"per_type\" or \"flat\"",
                    ))
                }
            },
            None => defaults.earnings_policy,
        };

        let coordinate_mode = match var("FIXED_COORDINATES") {
            Some(raw) => CoordinateMode::Fixed(
                Coordinates::parse(&raw)
                    .map_err(|err| ConfigError::new("FIXED_COORDINATES", &raw, err))?,
            ),
            None => CoordinateMode::FromRequest,
        };

        let stream_interval = match var("STREAM_INTERVAL_MS") {
            Some(raw) => {
                let millis = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|err| ConfigError::new("STREAM_INTERVAL_MS", &raw, err))?;
                if millis == 0 {
                    return Err(ConfigError::new(
                        "STREAM_INTERVAL_MS",
                        &raw,
                        "must be greater than zero",
                    ));
                }
                Duration::from_millis(millis)
            }
            None => defaults.stream_interval,
        };

        let config = Self {
            host,
            port,
            store_backend,
            data_file,
            coords_file,
            earnings_policy,
            rates,
            coordinate_mode,
            stream_interval,
        };

        debug!("Loaded configuration: {:?}", config);

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.earnings_policy, self.rates.fallback())
    }
}

fn parse_rate(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    let rate = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| ConfigError::new(key, raw, err))?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(ConfigError::new(key, raw, "rate must be a non-negative number"));
    }
    Ok(rate)
}

/// Parses `TYPE=rate` pairs separated by commas, e.g. `SWIPE_UP=0.05,qr=1.00`.
fn parse_rate_table(raw: &str) -> Result<HashMap<String, f64>, ConfigError> {
    let mut rates = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((kind, rate)) = entry.split_once('=') else {
            return Err(ConfigError::new("RATE_TABLE", entry, "expected TYPE=rate"));
        };
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ConfigError::new("RATE_TABLE", entry, "missing interaction type"));
        }
        rates.insert(kind.to_string(), parse_rate("RATE_TABLE", rate)?);
    }

    Ok(rates)
}
