use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{GithubProfile, QuoteOutcome, UpstreamFailure, WeatherReport};
use crate::Result;

/// One independently fetched part of the dashboard.
///
/// A ready section serializes as its payload; a failed one as
/// `{ "error": { "provider": ..., "cause": ... } }`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Section<T> {
    Ready(Arc<T>),
    Failed { error: UpstreamFailure },
}

impl<T> Section<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            Section::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&UpstreamFailure> {
        match self {
            Section::Ready(_) => None,
            Section::Failed { error } => Some(error),
        }
    }
}

impl<T> From<Result<Arc<T>>> for Section<T> {
    fn from(result: Result<Arc<T>>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(err) => Section::Failed {
                error: UpstreamFailure::from(&err),
            },
        }
    }
}

/// Combined dashboard response.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub weather: Section<WeatherReport>,
    pub github: Section<GithubProfile>,
    pub news: Section<Value>,
    pub stocks: Vec<QuoteOutcome>,
    pub timestamp: DateTime<Utc>,
}

impl Dashboard {
    /// Names of the sections that failed, in response order.
    pub fn failed_sections(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.weather.is_ready() {
            failed.push("weather");
        }
        if !self.github.is_ready() {
            failed.push("github");
        }
        if !self.news.is_ready() {
            failed.push("news");
        }
        failed
    }
}

/// Query parameters of the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub city: String,
    pub stocks: Vec<String>,
}

impl DashboardQuery {
    pub const DEFAULT_CITY: &str = "Toronto";
    pub const DEFAULT_STOCKS: &str = "AAPL,GOOGL,MSFT";

    /// Build from optional raw parameters. `stocks` is a comma-separated
    /// symbol list; blank entries are dropped.
    pub fn from_params(city: Option<&str>, stocks: Option<&str>) -> Self {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(Self::DEFAULT_CITY);
        let stocks = stocks.unwrap_or(Self::DEFAULT_STOCKS);
        Self {
            city: city.to_owned(),
            stocks: stocks
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self::from_params(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayError;

    #[test]
    fn default_query() {
        let query = DashboardQuery::default();
        assert_eq!(query.city, "Toronto");
        assert_eq!(query.stocks, vec!["AAPL", "GOOGL", "MSFT"]);
    }

    #[test]
    fn stocks_list_drops_blanks() {
        let query = DashboardQuery::from_params(Some("Oslo"), Some("tsla, ,NVDA,"));
        assert_eq!(query.city, "Oslo");
        assert_eq!(query.stocks, vec!["tsla", "NVDA"]);
    }

    #[test]
    fn failed_section_serializes_error() {
        let section: Section<Value> = Section::from(Err(GatewayError::Timeout {
            provider: "newsapi".into(),
        }));
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["error"]["provider"], "newsapi");
        assert!(json["error"]["cause"].as_str().unwrap().contains("timed out"));
    }

    #[test]
    fn ready_section_serializes_payload() {
        let section: Section<Value> = Section::from(Ok(Arc::new(serde_json::json!({"a": 1}))));
        assert_eq!(serde_json::to_value(&section).unwrap(), serde_json::json!({"a": 1}));
    }
}
