use std::collections::HashMap;

pub const DEFAULT_FALLBACK_RATE: f64 = 0.20;

pub const DEFAULT_RATES: &[(&str, f64)] = &[
    ("SWIPE_UP", 0.05),
    ("SWIPE_DOWN", 0.05),
    ("SWIPE_RIGHT", 0.10),
    ("qr", 1.00),
];

/// Maps an interaction type to the amount earned for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    fallback: f64,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>, fallback: f64) -> Self {
        Self { rates, fallback }
    }

    /// Exact, case-sensitive match on the interaction type; anything else
    /// earns the fallback rate.
    pub fn lookup(&self, interaction_type: &str) -> f64 {
        self.rates
            .get(interaction_type)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let rates = DEFAULT_RATES
            .iter()
            .map(|(kind, rate)| (kind.to_string(), *rate))
            .collect();
        Self::new(rates, DEFAULT_FALLBACK_RATE)
    }
}

/// How per-ad and total earnings are derived from the event log.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EarningsPolicy {
    /// Sum of the earnings stored on each event at ingestion time.
    #[default]
    PerType,
    /// Interaction count multiplied by a single rate.
    Flat { rate: f64 },
}
