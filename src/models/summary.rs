use serde::{Deserialize, Serialize};

/// Interactions and earnings for a single ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSummary {
    pub ad_id: String,

    #[serde(rename = "Interactions")]
    pub interactions: u64,

    #[serde(rename = "Earnings")]
    pub earnings: f64,
}

/// The per-ad table together with the total and today counters. Returned by
/// the ingestion endpoint, the summary endpoint and every stream message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBundle {
    pub table: Vec<AdSummary>,
    pub total_earnings: f64,
    pub earnings_today: f64,
    pub interactions_today: u64,
    pub total_interactions: u64,
}
