use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::*;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::WeatherConfig;

#[derive(Debug, Clone, Error)]
pub enum WeatherApiError {
    #[error("Weather request failed. {0}")]
    RequestError(String),
    #[error("Weather provider returned an error: status {status}, {message}")]
    QueryError { status: u16, message: String },
    #[error("Weather response could not be parsed. {0}")]
    MalformedResponse(String),
}

/// The shaped weather payload returned to clients. `uv_index` is an optional enrichment: when the
/// UV call fails the field is omitted rather than failing the whole response.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub uv_index: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Client for the current-weather provider, keyed by latitude/longitude.
#[derive(Clone)]
pub struct WeatherApi {
    config: WeatherConfig,
    client: Arc<Client>,
}

impl WeatherApi {
    pub fn new(config: WeatherConfig) -> Self {
        Self { config, client: Arc::new(Client::new()) }
    }

    /// Current conditions at the given coordinates, with the UV index best-effort on top.
    pub async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, WeatherApiError> {
        let weather = self.query("weather", latitude, longitude, &[("units", "metric")]).await?;
        let uv_index = match self.query("uvi", latitude, longitude, &[]).await {
            Ok(uv) => uv["value"].as_f64(),
            Err(e) => {
                // Degrade gracefully: the forecast is still useful without the UV index.
                debug!("🌦️ UV index not available: {e}");
                None
            },
        };
        let report = WeatherReport {
            temperature: require_f64(&weather, "/main/temp")?,
            feels_like: require_f64(&weather, "/main/feels_like")?,
            humidity: require_f64(&weather, "/main/humidity")?,
            pressure: require_f64(&weather, "/main/pressure")?,
            description: weather
                .pointer("/weather/0/description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            icon: weather.pointer("/weather/0/icon").and_then(Value::as_str).unwrap_or_default().to_string(),
            wind_speed: weather.pointer("/wind/speed").and_then(Value::as_f64).unwrap_or(0.0),
            wind_direction: weather.pointer("/wind/deg").and_then(Value::as_f64).unwrap_or(0.0),
            uv_index,
            timestamp: Utc::now(),
        };
        Ok(report)
    }

    async fn query(
        &self,
        endpoint: &str,
        latitude: f64,
        longitude: f64,
        extra_params: &[(&str, &str)],
    ) -> Result<Value, WeatherApiError> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), endpoint);
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let mut params = vec![("lat", lat.as_str()), ("lon", lon.as_str()), ("appid", self.config.api_key.reveal())];
        params.extend_from_slice(extra_params);
        trace!("🌦️ Querying weather endpoint {endpoint} for ({latitude}, {longitude})");
        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| WeatherApiError::RequestError(e.to_string()))?;
            return Err(WeatherApiError::QueryError { status, message });
        }
        response.json().await.map_err(|e| WeatherApiError::MalformedResponse(e.to_string()))
    }
}

fn require_f64(value: &Value, pointer: &str) -> Result<f64, WeatherApiError> {
    value
        .pointer(pointer)
        .and_then(Value::as_f64)
        .ok_or_else(|| WeatherApiError::MalformedResponse(format!("missing field {pointer}")))
}
