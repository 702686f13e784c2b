use chrono::{DateTime, Local, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Timestamps are written as local time without an offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One recorded ad interaction.
///
/// Fields are read leniently so a hand-edited or legacy record never makes
/// the whole log unreadable: non-string text fields become empty strings and
/// a missing, negative or non-numeric `earnings` is kept as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, deserialize_with = "lenient_string")]
    pub coordinates: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub interaction_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub earnings: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateEvent {
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub coordinates: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub interaction_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_id: String,
}

impl Event {
    pub fn new(
        coordinates: String,
        interaction_type: String,
        ad_id: String,
        earnings: f64,
        recorded_at: NaiveDateTime,
    ) -> Self {
        Self {
            coordinates,
            interaction_type,
            ad_id,
            timestamp: recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            earnings: Some(earnings),
        }
    }

    /// Local time the event was recorded, if the stored timestamp parses.
    /// Offset-qualified timestamps are converted to local time.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.trim();
        raw.parse::<NaiveDateTime>().ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|at| at.with_timezone(&Local).naive_local())
        })
    }
}

impl CreateEvent {
    /// The body must be a JSON object; every field is optional.
    pub fn from_json(body: Value) -> Result<Self, serde_json::Error> {
        if !body.is_object() {
            return Err(de::Error::custom("expected a JSON object"));
        }
        serde_json::from_value(body)
    }
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?))
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|value| value.is_finite() && *value >= 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(h, m, 5, 120_000)
            .unwrap()
    }

    #[test]
    fn test_new_event_has_all_fields() {
        let event = Event::new(
            "(1, 2)".to_string(),
            "qr".to_string(),
            "A1".to_string(),
            1.0,
            at(14, 30),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["coordinates"], "(1, 2)");
        assert_eq!(value["interaction_type"], "qr");
        assert_eq!(value["ad_id"], "A1");
        assert_eq!(value["timestamp"], "2024-03-09T14:30:05.120000");
        assert_eq!(value["earnings"], 1.0);
        assert_eq!(event.recorded_at(), Some(at(14, 30)));
    }

    #[test]
    fn test_recorded_at_accepts_variants() {
        let mut event: Event = serde_json::from_value(json!({
            "timestamp": "2024-03-09T08:00:00"
        }))
        .unwrap();
        assert_eq!(
            event.recorded_at().map(|t| t.date()),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );

        event.timestamp = "2024-03-09T08:00:00+00:00".to_string();
        assert!(event.recorded_at().is_some());

        event.timestamp = "yesterday".to_string();
        assert_eq!(event.recorded_at(), None);
    }

    #[test]
    fn test_legacy_record_is_read_leniently() {
        let event: Event = serde_json::from_value(json!({
            "ad_id": 42,
            "interaction_type": null,
            "earnings": "abc"
        }))
        .unwrap();

        assert_eq!(event.ad_id, "42");
        assert_eq!(event.interaction_type, "");
        assert_eq!(event.coordinates, "");
        assert_eq!(event.earnings, None);
    }

    #[test]
    fn test_earnings_parsing() {
        let parse = |v: Value| {
            serde_json::from_value::<Event>(json!({ "earnings": v }))
                .unwrap()
                .earnings
        };
        assert_eq!(parse(json!(0.05)), Some(0.05));
        assert_eq!(parse(json!("1.5")), Some(1.5));
        assert_eq!(parse(json!(-1.0)), None);
        assert_eq!(parse(json!([1])), None);
    }

    #[test]
    fn test_create_event_requires_object() {
        assert!(CreateEvent::from_json(json!(["qr", "A1"])).is_err());
        assert!(CreateEvent::from_json(json!("qr")).is_err());

        let request = CreateEvent::from_json(json!({"interaction_type": "qr"})).unwrap();
        assert_eq!(request.interaction_type, "qr");
        assert_eq!(request.ad_id, "");
        assert_eq!(request.coordinates, None);
    }
}
