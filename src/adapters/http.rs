use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::core::DataSource;
use crate::domain::model::{EventsDocument, RawEvent};
use crate::utils::error::{MapError, Result};

/// Reads the event dataset with a plain GET against `api_path`.
pub struct HttpDataSource {
    client: Client,
    api_path: String,
}

impl HttpDataSource {
    pub fn new(api_path: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_path: api_path.into(),
        }
    }

    pub fn with_timeout(api_path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_path: api_path.into(),
        })
    }

    pub fn api_path(&self) -> &str {
        &self.api_path
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_events(&self) -> Result<Vec<RawEvent>> {
        tracing::debug!("Making API request to: {}", self.api_path);
        let response = self.client.get(&self.api_path).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(MapError::StatusError {
                url: self.api_path.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let document = EventsDocument::from_json_str(&body)?;
        tracing::debug!(
            "Decoded {} events with {} locations",
            document.events.len(),
            document.location_count()
        );
        Ok(document.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_events_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/events");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "events": [
                        {"id": "1", "title": "A", "address": "x", "locations": [{"lat": 40, "lng": -100}]},
                        {"id": "2", "title": "B", "address": "y", "locations": []}
                    ]
                }));
        });

        let source = HttpDataSource::new(server.url("/events"));
        let events = source.fetch_events().await.unwrap();

        api_mock.assert();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].locations[0].lat, Some(40.0));
    }

    #[tokio::test]
    async fn test_fetch_events_text_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/events");
            then.status(200)
                .header("Content-Type", "text/plain")
                .body(r#"{"events": [{"id": "3", "title": "C", "address": "z", "locations": []}]}"#);
        });

        let source = HttpDataSource::new(server.url("/events"));
        let events = source.fetch_events().await.unwrap();

        api_mock.assert();
        assert_eq!(events[0].id, "3");
    }

    #[tokio::test]
    async fn test_fetch_events_server_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/events");
            then.status(500);
        });

        let source = HttpDataSource::new(server.url("/events"));
        let err = source.fetch_events().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, MapError::StatusError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_events_malformed_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/events");
            then.status(200).body("{\"events\": [");
        });

        let source = HttpDataSource::new(server.url("/events"));
        let err = source.fetch_events().await.unwrap_err();

        assert!(matches!(err, MapError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_fetch_events_unreachable_host() {
        // Port 9 (discard) is not expected to be listening locally.
        let source =
            HttpDataSource::with_timeout("http://127.0.0.1:9/events", Duration::from_secs(2)).unwrap();
        let err = source.fetch_events().await.unwrap_err();

        assert!(matches!(err, MapError::TransportError(_)));
    }
}
