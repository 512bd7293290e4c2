//! Forward geocoding: convert a place name to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::types::{Coordinate, WeatherError};

/// Nominatim search endpoint.
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Geocoder against the Nominatim search API.
///
/// Nominatim's usage policy requires an identifying `User-Agent`, so the
/// header is set on the client at construction. Lookups never fail outward:
/// any failure resolves to [`Coordinate::DEFAULT`].
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    /// Build a geocoder against the public Nominatim instance.
    ///
    /// # Errors
    /// Returns [`WeatherError::Network`] if the HTTP client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(user_agent, NOMINATIM_URL)
    }

    /// Build a geocoder against a specific endpoint (used by tests).
    ///
    /// # Errors
    /// Returns [`WeatherError::Network`] if the HTTP client cannot be built.
    pub fn with_base_url(user_agent: &str, base_url: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Resolve a free-text place name to a coordinate.
    ///
    /// Empty input issues no request at all. Request failures, non-2xx
    /// statuses, unparsable bodies, and empty result sets are all masked by
    /// the default coordinate; they are logged at `debug` and never surfaced.
    pub async fn resolve(&self, city: &str) -> Coordinate {
        let city = city.trim();
        if city.is_empty() {
            return Coordinate::DEFAULT;
        }

        match self.lookup(city).await {
            Some(coordinate) => coordinate,
            None => {
                tracing::debug!("Geocoding failed for {:?}, using default location", city);
                Coordinate::DEFAULT
            }
        }
    }

    async fn lookup(&self, city: &str) -> Option<Coordinate> {
        let response = match self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Geocode returned status {}", response.status());
            return None;
        }

        let hits: Vec<NominatimHit> = match response.json().await {
            Ok(h) => h,
            Err(e) => {
                tracing::debug!("Geocode parse error: {}", e);
                return None;
            }
        };

        let hit = hits.into_iter().next()?;
        let latitude = hit.lat.parse().ok()?;
        let longitude = hit.lon.parse().ok()?;

        tracing::info!("Geocoded {:?} to ({}, {})", city, latitude, longitude);
        Some(Coordinate {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn geocoder(server: &MockServer) -> Geocoder {
        Geocoder::with_base_url("raincheck-test", &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn empty_city_skips_request_and_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let geocoder = geocoder(&server).await;
        assert_eq!(geocoder.resolve("").await, Coordinate::DEFAULT);
        assert_eq!(geocoder.resolve("   ").await, Coordinate::DEFAULT);
    }

    #[tokio::test]
    async fn first_hit_is_resolved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Paris"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "lat": "48.8566", "lon": "2.3522", "display_name": "Paris, France" },
                { "lat": "33.6617", "lon": "-95.5555", "display_name": "Paris, Texas" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let geocoder = geocoder(&server).await;
        let coordinate = geocoder.resolve("Paris").await;
        assert_eq!(coordinate.latitude, 48.8566);
        assert_eq!(coordinate.longitude, 2.3522);
    }

    #[tokio::test]
    async fn server_error_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let geocoder = geocoder(&server).await;
        assert_eq!(geocoder.resolve("London").await, Coordinate::DEFAULT);
    }

    #[tokio::test]
    async fn empty_result_set_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let geocoder = geocoder(&server).await;
        assert_eq!(geocoder.resolve("Nowhereville").await, Coordinate::DEFAULT);
    }

    #[tokio::test]
    async fn unparsable_body_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let geocoder = geocoder(&server).await;
        assert_eq!(geocoder.resolve("London").await, Coordinate::DEFAULT);
    }
}
