use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;

/// "Not found" is user-correctable and surfaced on the location field;
/// everything else (transport, HTTP status, parsing) collapses into a
/// generic retry-later failure with no internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    #[error("location not found")]
    NotFound,
    #[error("geocoding service unavailable")]
    Service,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    display_name: String,
}

/// Lookup client for a nominatim-style search endpoint. Constructed once at
/// startup and shared read-only through the router state.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    search_url: String,
    user_agent: String,
}

impl Geocoder {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("failed to build geocoder HTTP client");

        Self {
            client,
            search_url: config.geocoder_url.clone(),
            user_agent: format!("eventhub/{}", config.app_version),
        }
    }

    /// Resolves free-text input to the provider's canonical display name.
    /// The original input is discarded in favor of the first candidate's
    /// formatted string.
    pub async fn resolve(&self, query: &str) -> Result<String, GeocodeError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json")])
            .header("User-Agent", &self.user_agent)
            .header("Accept-Language", "en")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(error = %e, "geocoding request failed");
                GeocodeError::Service
            })?;

        let candidates: Vec<Candidate> = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "geocoding response was not parseable");
            GeocodeError::Service
        })?;

        match candidates.into_iter().next() {
            Some(candidate) => Ok(candidate.display_name),
            None => Err(GeocodeError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: String) -> Config {
        let mut config = Config::from_env();
        config.geocoder_url = url;
        config.app_version = "1.0".to_string();
        config
    }

    #[tokio::test]
    async fn test_resolve_returns_first_display_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Berlin"))
            .and(query_param("format", "json"))
            .and(header("User-Agent", "eventhub/1.0"))
            .and(header("Accept-Language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"display_name": "Berlin, Germany", "lat": "52.5"},
                {"display_name": "Berlin, New Hampshire, United States"}
            ])))
            .mount(&server)
            .await;

        let geocoder = Geocoder::new(&test_config(format!("{}/search", server.uri())));
        let resolved = geocoder.resolve("Berlin").await.unwrap();
        assert_eq!(resolved, "Berlin, Germany");
    }

    #[tokio::test]
    async fn test_empty_result_set_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let geocoder = Geocoder::new(&test_config(format!("{}/search", server.uri())));
        assert_eq!(
            geocoder.resolve("Nowhereville").await,
            Err(GeocodeError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_server_error_is_service_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let geocoder = Geocoder::new(&test_config(format!("{}/search", server.uri())));
        assert_eq!(
            geocoder.resolve("Berlin").await,
            Err(GeocodeError::Service)
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_service_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let geocoder = Geocoder::new(&test_config(format!("{}/search", server.uri())));
        assert_eq!(
            geocoder.resolve("Berlin").await,
            Err(GeocodeError::Service)
        );
    }
}
