//! Upstream National Weather Service client
//!
//! Single fetch primitive plus typed projections of the NWS GeoJSON payloads.
//! Fetch failures are explicit `FetchError` values; the tool layer decides
//! what fallback text each failure becomes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const NWS_API_BASE: &str = "https://api.weather.gov";
pub const NWS_USER_AGENT: &str = "weather-app/1.0";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("upstream response was not valid JSON: {0}")]
    Decode(reqwest::Error),
}

/// Active alerts document. `features` stays optional so a payload without
/// the key is distinguishable from an empty alert list.
#[derive(Debug, Deserialize)]
pub struct AlertsResponse {
    pub features: Option<Vec<AlertFeature>>,
}

#[derive(Debug, Deserialize)]
pub struct AlertFeature {
    #[serde(default)]
    pub properties: AlertProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertProperties {
    pub event: Option<String>,
    #[serde(rename = "areaDesc")]
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PointsResponse {
    pub properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
pub struct PointsProperties {
    pub forecast: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: i32,
    #[serde(rename = "temperatureUnit")]
    pub temperature_unit: String,
    #[serde(rename = "windSpeed")]
    pub wind_speed: String,
    #[serde(rename = "windDirection")]
    pub wind_direction: String,
    #[serde(rename = "detailedForecast")]
    pub detailed_forecast: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn active_alerts(&self, state: &str) -> Result<AlertsResponse, FetchError>;
    async fn point_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PointsResponse, FetchError>;
    async fn forecast(&self, url: &str) -> Result<ForecastResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
}

impl NwsClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { http })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, NWS_USER_AGENT)
            .header(header::ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.json::<T>().await.map_err(FetchError::Decode)
    }
}

pub fn alerts_url(state: &str) -> String {
    format!("{NWS_API_BASE}/alerts/active/area/{state}")
}

pub fn points_url(latitude: f64, longitude: f64) -> String {
    format!("{NWS_API_BASE}/points/{latitude},{longitude}")
}

#[async_trait]
impl WeatherProvider for NwsClient {
    async fn active_alerts(&self, state: &str) -> Result<AlertsResponse, FetchError> {
        self.get_json(&alerts_url(state)).await
    }

    async fn point_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PointsResponse, FetchError> {
        self.get_json(&points_url(latitude, longitude)).await
    }

    async fn forecast(&self, url: &str) -> Result<ForecastResponse, FetchError> {
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_alerts_url_from_state_code() {
        assert_eq!(
            alerts_url("CA"),
            "https://api.weather.gov/alerts/active/area/CA"
        );
    }

    #[test]
    fn builds_points_url_from_coordinates() {
        assert_eq!(
            points_url(37.7749, -122.4194),
            "https://api.weather.gov/points/37.7749,-122.4194"
        );
    }

    #[test]
    fn alerts_payload_without_features_key_decodes_to_none() {
        let parsed: AlertsResponse =
            serde_json::from_str(r#"{"title":"watches and warnings"}"#).expect("valid json");
        assert!(parsed.features.is_none());
    }

    #[test]
    fn alerts_payload_with_empty_features_decodes_to_empty_vec() {
        let parsed: AlertsResponse =
            serde_json::from_str(r#"{"features":[]}"#).expect("valid json");
        assert_eq!(parsed.features.expect("features present").len(), 0);
    }

    #[test]
    fn alert_feature_defaults_missing_properties() {
        let parsed: AlertFeature = serde_json::from_str(r#"{}"#).expect("valid json");
        assert!(parsed.properties.event.is_none());
        assert!(parsed.properties.instruction.is_none());
    }

    #[test]
    fn forecast_period_decodes_renamed_fields() {
        let parsed: ForecastPeriod = serde_json::from_str(
            r#"{
                "name": "Tonight",
                "temperature": 54,
                "temperatureUnit": "F",
                "windSpeed": "5 mph",
                "windDirection": "NW",
                "detailedForecast": "Partly cloudy."
            }"#,
        )
        .expect("valid json");
        assert_eq!(parsed.name, "Tonight");
        assert_eq!(parsed.temperature, 54);
        assert_eq!(parsed.temperature_unit, "F");
        assert_eq!(parsed.wind_speed, "5 mph");
    }
}
