//! Alpha Vantage client for quotes and daily series.
//!
//! Alpha Vantage reports rate limiting and unknown symbols with a 200
//! response whose body carries `Error Message`, `Note` or `Information`
//! instead of data. Those bodies are mapped to errors here so they are
//! never cached as successful results.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::http::{require_key, send_json};
use super::traits::QuoteProvider;
use crate::{GatewayError, Result};

const PROVIDER: &str = "alphavantage";

/// Default base URL for the Alpha Vantage API
const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Body fields Alpha Vantage uses in place of data.
const NOTICE_FIELDS: [&str; 3] = ["Error Message", "Note", "Information"];

#[derive(Clone)]
pub struct AlphaVantageClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl AlphaVantageClient {
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

    /// `GLOBAL_QUOTE` for one symbol.
    pub async fn quote(&self, symbol: &str) -> Result<Value> {
        self.query("GLOBAL_QUOTE", symbol).await
    }

    /// `TIME_SERIES_DAILY` for one symbol.
    pub async fn daily_series(&self, symbol: &str) -> Result<Value> {
        self.query("TIME_SERIES_DAILY", symbol).await
    }

    async fn query(&self, function: &str, symbol: &str) -> Result<Value> {
        let api_key = require_key(PROVIDER, &self.api_key)?;
        let request = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[("function", function), ("symbol", symbol), ("apikey", api_key)]);
        let body = send_json(PROVIDER, request).await?;
        check_notice(body)
    }
}

fn check_notice(body: Value) -> Result<Value> {
    let notice = NOTICE_FIELDS
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str));
    match notice {
        Some(message) => {
            tracing::warn!(
                provider = PROVIDER,
                notice = message,
                "provider returned a notice instead of data"
            );
            Err(GatewayError::Upstream {
                provider: PROVIDER.to_owned(),
                status: 200,
                message: message.to_owned(),
            })
        }
        None => Ok(body),
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn quote(&self, symbol: &str) -> Result<Value> {
        AlphaVantageClient::quote(self, symbol).await
    }

    async fn daily_series(&self, symbol: &str) -> Result<Value> {
        AlphaVantageClient::daily_series(self, symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_bodies_are_errors() {
        let err = check_notice(serde_json::json!({
            "Note": "Thank you for using Alpha Vantage! \
                     Our standard API call frequency is 5 calls per minute."
        }))
        .unwrap_err();
        assert_eq!(err.provider(), Some("alphavantage"));

        assert!(check_notice(serde_json::json!({"Error Message": "Invalid API call."})).is_err());
        assert!(check_notice(serde_json::json!({"Global Quote": {"01. symbol": "IBM"}})).is_ok());
    }
}
