//! Forecast retrieval from the Open-Meteo API.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

use crate::types::{Coordinate, WeatherError};

/// Open-Meteo daily forecast endpoint.
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the daily precipitation forecast endpoint.
///
/// Requests exactly one day of the `precipitation_sum` daily variable with a
/// fixed timezone. The response body is returned as opaque JSON; no retries,
/// no backoff.
#[derive(Debug, Clone)]
pub struct ForecastProvider {
    client: Client,
    base_url: String,
}

impl ForecastProvider {
    /// Build a provider against the public Open-Meteo instance.
    ///
    /// # Errors
    /// Returns [`WeatherError::Network`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(OPEN_METEO_URL)
    }

    /// Build a provider against a specific endpoint (used by tests).
    ///
    /// # Errors
    /// Returns [`WeatherError::Network`] if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch the precipitation forecast for a single day.
    ///
    /// # Errors
    /// Returns [`WeatherError::Api`] for any non-200 status,
    /// [`WeatherError::Network`] for transport failures, and
    /// [`WeatherError::Parse`] when the body is not JSON.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
    ) -> Result<Value, WeatherError> {
        let url = format!(
            "{}?latitude={}&longitude={}&daily=precipitation_sum&timezone=Europe%2FLondon&start_date={date}&end_date={date}",
            self.base_url, coordinate.latitude, coordinate.longitude,
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            tracing::warn!("Forecast request returned status {}", status);
            return Err(WeatherError::Api { status });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("invalid forecast body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn fetch_requests_exactly_one_day() {
        let server = MockServer::start().await;
        let body = json!({ "daily": { "precipitation_sum": [2.3] } });
        Mock::given(method("GET"))
            .and(query_param("latitude", "51.5074"))
            .and(query_param("longitude", "-0.1278"))
            .and(query_param("daily", "precipitation_sum"))
            .and(query_param("timezone", "Europe/London"))
            .and(query_param("start_date", "2024-03-01"))
            .and(query_param("end_date", "2024-03-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ForecastProvider::with_base_url(&server.uri()).unwrap();
        let fetched = provider
            .fetch(Coordinate::DEFAULT, date("2024-03-01"))
            .await
            .unwrap();
        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn non_200_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = ForecastProvider::with_base_url(&server.uri()).unwrap();
        let err = provider
            .fetch(Coordinate::DEFAULT, date("2024-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Api { status: 503 }));
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let provider = ForecastProvider::with_base_url(&server.uri()).unwrap();
        let err = provider
            .fetch(Coordinate::DEFAULT, date("2024-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }
}
