use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current conditions and forecast for one city.
///
/// Both halves are required; a report is never built from one of them alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: Value,
    pub forecast: Value,
}

impl WeatherReport {
    /// Merge the two OpenWeather payloads into one report.
    pub fn merge(current: Value, forecast: Value) -> Self {
        Self { current, forecast }
    }
}
