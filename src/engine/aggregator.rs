use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{AdSummary, AggregateBundle, EarningsPolicy, Event};

/// Derives the per-ad table and the total/today counters from the full
/// event log. Nothing is cached between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregator {
    policy: EarningsPolicy,
    fallback_rate: f64,
}

#[derive(Default)]
struct Tally {
    interactions: u64,
    earnings: f64,
}

impl Tally {
    fn add(&mut self, earnings: f64) {
        self.interactions += 1;
        self.earnings += earnings;
    }
}

impl Aggregator {
    pub fn new(policy: EarningsPolicy, fallback_rate: f64) -> Self {
        Self {
            policy,
            fallback_rate,
        }
    }

    pub fn summarize(&self, events: &[Event], today: NaiveDate) -> AggregateBundle {
        let mut per_ad: BTreeMap<&str, Tally> = BTreeMap::new();
        let mut total = Tally::default();
        let mut todays = Tally::default();

        for event in events {
            let earnings = self.stored_earnings(event);

            per_ad.entry(event.ad_id.as_str()).or_default().add(earnings);
            total.add(earnings);

            if event.recorded_at().map(|at| at.date()) == Some(today) {
                todays.add(earnings);
            }
        }

        let table = per_ad
            .into_iter()
            .map(|(ad_id, tally)| AdSummary {
                ad_id: ad_id.to_string(),
                interactions: tally.interactions,
                earnings: self.earnings_for(&tally),
            })
            .collect();

        AggregateBundle {
            table,
            total_earnings: self.earnings_for(&total),
            earnings_today: self.earnings_for(&todays),
            interactions_today: todays.interactions,
            total_interactions: total.interactions,
        }
    }

    fn stored_earnings(&self, event: &Event) -> f64 {
        event.earnings.unwrap_or(self.fallback_rate)
    }

    fn earnings_for(&self, tally: &Tally) -> f64 {
        match self.policy {
            EarningsPolicy::PerType => tally.earnings,
            EarningsPolicy::Flat { rate } => tally.interactions as f64 * rate,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(
            EarningsPolicy::PerType,
            crate::models::rates::DEFAULT_FALLBACK_RATE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn noon(d: u32) -> NaiveDateTime {
        day(d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn event(ad_id: &str, kind: &str, earnings: f64, at: NaiveDateTime) -> Event {
        Event::new(String::new(), kind.to_string(), ad_id.to_string(), earnings, at)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_log() {
        let bundle = Aggregator::default().summarize(&[], day(1));
        assert_eq!(bundle, AggregateBundle::default());
        assert!(bundle.table.is_empty());
    }

    #[test]
    fn test_per_type_sums_stored_earnings() {
        let events = vec![
            event("A1", "SWIPE_UP", 0.05, noon(1)),
            event("A1", "qr", 1.00, noon(1)),
        ];

        let bundle = Aggregator::default().summarize(&events, day(1));

        assert_eq!(bundle.table.len(), 1);
        assert_eq!(bundle.table[0].ad_id, "A1");
        assert_eq!(bundle.table[0].interactions, 2);
        assert!(approx(bundle.table[0].earnings, 1.05));
        assert!(approx(bundle.total_earnings, 1.05));
        assert_eq!(bundle.total_interactions, 2);
    }

    #[test]
    fn test_table_sorted_by_ad_id() {
        let events = vec![
            event("b", "qr", 1.0, noon(1)),
            event("A", "qr", 1.0, noon(1)),
            event("a", "qr", 1.0, noon(1)),
            event("b", "qr", 1.0, noon(1)),
        ];

        let bundle = Aggregator::default().summarize(&events, day(1));
        let ids: Vec<&str> = bundle.table.iter().map(|row| row.ad_id.as_str()).collect();

        assert_eq!(ids, vec!["A", "a", "b"]);
        let sum: u64 = bundle.table.iter().map(|row| row.interactions).sum();
        assert_eq!(sum, bundle.total_interactions);
    }

    #[test]
    fn test_today_counters_use_date_only() {
        let events = vec![
            event("A1", "qr", 1.0, day(2).and_hms_opt(0, 0, 1).unwrap()),
            event("A2", "SWIPE_UP", 0.05, day(2).and_hms_opt(23, 59, 59).unwrap()),
            event("A1", "qr", 1.0, day(1).and_hms_opt(23, 59, 59).unwrap()),
        ];

        let bundle = Aggregator::default().summarize(&events, day(2));

        assert_eq!(bundle.interactions_today, 2);
        assert_eq!(bundle.total_interactions, 3);
        assert!(approx(bundle.earnings_today, 1.05));
        assert!(approx(bundle.total_earnings, 2.05));
    }

    #[test]
    fn test_flat_policy_multiplies_counts() {
        let aggregator = Aggregator::new(EarningsPolicy::Flat { rate: 0.2 }, 0.2);
        let events = vec![
            event("A1", "qr", 1.0, noon(3)),
            event("A1", "SWIPE_UP", 0.05, noon(3)),
            event("A2", "qr", 1.0, noon(2)),
        ];

        let bundle = aggregator.summarize(&events, day(3));

        assert!(approx(bundle.table[0].earnings, 0.4));
        assert!(approx(bundle.table[1].earnings, 0.2));
        assert!(approx(bundle.total_earnings, 0.6));
        assert!(approx(bundle.earnings_today, 0.4));
    }

    #[test]
    fn test_missing_earnings_fall_back() {
        let mut legacy = event("A1", "qr", 1.0, noon(1));
        legacy.earnings = None;
        let mut undated = event("A1", "qr", 1.0, noon(1));
        undated.timestamp = "not a time".to_string();

        let aggregator = Aggregator::new(EarningsPolicy::PerType, 0.2);
        let bundle = aggregator.summarize(&[legacy, undated], day(1));

        assert!(approx(bundle.total_earnings, 1.2));
        assert_eq!(bundle.interactions_today, 1);
        assert_eq!(bundle.total_interactions, 2);
    }

    #[test]
    fn test_summarize_is_repeatable() {
        let events = vec![
            event("A1", "qr", 1.0, noon(1)),
            event("A2", "SWIPE_DOWN", 0.05, noon(1)),
        ];
        let aggregator = Aggregator::default();
        assert_eq!(
            aggregator.summarize(&events, day(1)),
            aggregator.summarize(&events, day(1))
        );
    }
}
