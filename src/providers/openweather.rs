//! OpenWeather client (current conditions and 5-day forecast).
//!
//! See: <https://openweathermap.org/api>

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::http::{require_key, send_json};
use super::traits::WeatherProvider;
use crate::Result;

const PROVIDER: &str = "openweather";

/// Default base URL for the OpenWeather API
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Client for the OpenWeather data API. Temperatures are requested in
/// metric units.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a client. Without an API key every call fails with
    /// `MissingCredentials`.
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self {
            api_key,
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Point the client at a different host (for testing with wiremock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn current(&self, city: &str) -> Result<Value> {
        self.get("weather", city).await
    }

    pub async fn forecast(&self, city: &str) -> Result<Value> {
        self.get("forecast", city).await
    }

    async fn get(&self, resource: &str, city: &str) -> Result<Value> {
        let api_key = require_key(PROVIDER, &self.api_key)?;
        let url = format!("{}/data/2.5/{resource}", self.base_url);
        let request = self
            .http
            .get(url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")]);
        send_json(PROVIDER, request).await
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn current(&self, city: &str) -> Result<Value> {
        OpenWeatherClient::current(self, city).await
    }

    async fn forecast(&self, city: &str) -> Result<Value> {
        OpenWeatherClient::forecast(self, city).await
    }
}
