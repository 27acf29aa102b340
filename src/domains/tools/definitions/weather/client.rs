//! Open-Meteo HTTP client.
//!
//! Two endpoints are used: the geocoding search (city name to coordinates)
//! and the forecast API (coordinates to current conditions). Responses are
//! decoded into typed structures so that an empty or malformed body becomes
//! a [`WeatherError`] instead of a panic.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::core::config::WeatherConfig;

/// Number of geocoding candidates requested per search.
const GEOCODING_RESULT_COUNT: u32 = 10;
const GEOCODING_LANGUAGE: &str = "en";
const TEMPERATURE_UNIT: &str = "fahrenheit";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,is_day,precipitation,rain,showers,cloud_cover,weather_code,snowfall,wind_speed_10m,wind_direction_10m,wind_gusts_10m";
const HOURLY_FIELDS: &str = "temperature_2m,rain";

/// Errors talking to Open-Meteo.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    /// The body was not the JSON shape we expect.
    #[error("unexpected {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolved coordinates of a place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geocoding search response. `results` is omitted by the API when nothing matches.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<GeocodingCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
}

impl GeocodingResponse {
    /// Coordinates of the first candidate, if it has both.
    pub fn first_coordinates(&self) -> Option<Coordinates> {
        let first = self.results.first()?;
        Some(Coordinates {
            latitude: first.latitude?,
            longitude: first.longitude?,
        })
    }
}

/// Typed view of the forecast fields this server reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub current: CurrentConditions,
}

/// Only the weather code is read; the rest of `current` is passed through raw.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    weather_code: Value,
}

impl CurrentConditions {
    /// The WMO code, when the API sent an integral number.
    pub fn weather_code(&self) -> Option<i64> {
        match &self.weather_code {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
    }
}

/// A forecast as returned by the API, plus the decoded fields we use.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub raw: Value,
    pub parsed: ForecastResponse,
}

/// Client for the Open-Meteo geocoding and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// Search for a city and return its geocoding candidates.
    #[instrument(skip(self))]
    pub async fn geocode(&self, city: &str) -> Result<GeocodingResponse, WeatherError> {
        let count = GEOCODING_RESULT_COUNT.to_string();
        let query = [
            ("name", city),
            ("count", count.as_str()),
            ("language", GEOCODING_LANGUAGE),
            ("format", "json"),
        ];

        let body = self.get_json("geocoding", &self.config.geocoding_url, &query).await?;
        let response: GeocodingResponse =
            serde_json::from_value(body).map_err(|source| WeatherError::Decode {
                endpoint: "geocoding",
                source,
            })?;

        debug!("Geocoding returned {} candidate(s)", response.results.len());
        Ok(response)
    }

    /// Fetch current conditions and the hourly series for a location.
    #[instrument(skip(self))]
    pub async fn forecast(&self, coordinates: Coordinates) -> Result<Forecast, WeatherError> {
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let query = [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("hourly", HOURLY_FIELDS),
            ("models", self.config.model.as_str()),
            ("current", CURRENT_FIELDS),
            ("temperature_unit", TEMPERATURE_UNIT),
        ];

        let raw = self.get_json("forecast", &self.config.forecast_url, &query).await?;
        let parsed = ForecastResponse::deserialize(&raw).map_err(|source| WeatherError::Decode {
            endpoint: "forecast",
            source,
        })?;

        Ok(Forecast { raw, parsed })
    }

    async fn get_json(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, WeatherError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| WeatherError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status { endpoint, status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| WeatherError::Request { endpoint, source })?;

        serde_json::from_slice(&bytes).map_err(|source| WeatherError::Decode { endpoint, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(WeatherConfig {
            geocoding_url: format!("{}/v1/search", server.uri()),
            forecast_url: format!("{}/v1/forecast", server.uri()),
            ..WeatherConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_first_coordinates() {
        let response: GeocodingResponse = serde_json::from_value(json!({
            "results": [
                { "name": "Paris", "latitude": 48.85, "longitude": 2.35 },
                { "name": "Paris", "latitude": 33.66, "longitude": -95.55 }
            ]
        }))
        .unwrap();
        assert_eq!(
            response.first_coordinates(),
            Some(Coordinates { latitude: 48.85, longitude: 2.35 })
        );
    }

    #[test]
    fn test_first_coordinates_missing() {
        let empty: GeocodingResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_coordinates(), None);

        let partial: GeocodingResponse =
            serde_json::from_value(json!({ "results": [{ "latitude": 1.0 }] })).unwrap();
        assert_eq!(partial.first_coordinates(), None);
    }

    #[test]
    fn test_zero_coordinates_are_valid() {
        let response: GeocodingResponse = serde_json::from_value(json!({
            "results": [{ "latitude": 0.0, "longitude": 0.0 }]
        }))
        .unwrap();
        assert_eq!(
            response.first_coordinates(),
            Some(Coordinates { latitude: 0.0, longitude: 0.0 })
        );
    }

    #[tokio::test]
    async fn test_geocode_sends_search_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .and(query_param("count", "10"))
            .and(query_param("language", "en"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "latitude": 48.85, "longitude": 2.35 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).geocode("Paris").await.unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_forecast_sends_model_and_unit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85"))
            .and(query_param("longitude", "2.35"))
            .and(query_param("models", "gfs_seamless"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("hourly", HOURLY_FIELDS))
            .and(query_param("current", CURRENT_FIELDS))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "current": { "weather_code": 61 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let forecast = client_for(&server)
            .forecast(Coordinates { latitude: 48.85, longitude: 2.35 })
            .await
            .unwrap();
        assert_eq!(forecast.parsed.current.weather_code(), Some(61));
        assert_eq!(forecast.raw["current"]["weather_code"], 61);
    }

    #[test]
    fn test_weather_code_is_optional() {
        let decode = |current: Value| {
            ForecastResponse::deserialize(&json!({ "current": current }))
                .unwrap()
                .current
                .weather_code()
        };
        assert_eq!(decode(json!({ "weather_code": 3 })), Some(3));
        assert_eq!(decode(json!({ "weather_code": 3.0 })), Some(3));
        assert_eq!(decode(json!({ "weather_code": null })), None);
        assert_eq!(decode(json!({ "weather_code": "3" })), None);
        assert_eq!(decode(json!({ "weather_code": 2.5 })), None);
        assert_eq!(decode(json!({ "temperature_2m": 58.3 })), None);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).geocode("Paris").await.unwrap_err();
        assert!(matches!(
            err,
            WeatherError::Status { endpoint: "geocoding", status } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn test_malformed_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hourly": {} })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .forecast(Coordinates { latitude: 1.0, longitude: 1.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Decode { endpoint: "forecast", .. }));
    }
}
