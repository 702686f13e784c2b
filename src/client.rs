use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Serialize)]
struct EventPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<&'a str>,
    interaction_type: &'a str,
    ad_id: &'a str,
}

/// Posts interactions to a running server's `/api/data` endpoint.
#[derive(Clone)]
pub struct IngestClient {
    client: Client,
    base_url: String,
}

impl IngestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the response status and its JSON body (`Value::Null` when
    /// the body is not JSON, e.g. on a 400).
    pub async fn post_event(
        &self,
        coordinates: Option<&str>,
        interaction_type: &str,
        ad_id: &str,
    ) -> reqwest::Result<(StatusCode, Value)> {
        let url = format!("{}/api/data", self.base_url);
        let payload = EventPayload {
            coordinates,
            interaction_type,
            ad_id,
        };

        info!("Posting {} interaction for ad '{}' to {}", interaction_type, ad_id, url);

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);

        Ok((status, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_omits_missing_coordinates() {
        let payload = EventPayload {
            coordinates: None,
            interaction_type: "qr",
            ad_id: "A1",
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"interaction_type": "qr", "ad_id": "A1"}));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = IngestClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
