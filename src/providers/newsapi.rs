//! NewsAPI top-headlines client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::http::{require_key, send_json};
use super::traits::NewsProvider;
use crate::types::NewsQuery;
use crate::{GatewayError, Result};

const PROVIDER: &str = "newsapi";

/// Default base URL for NewsAPI
const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Clone)]
pub struct NewsApiClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl NewsApiClient {
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

    pub async fn top_headlines(&self, query: &NewsQuery) -> Result<Value> {
        let api_key = require_key(PROVIDER, &self.api_key)?;
        let page_size = query.page_size.to_string();
        let request = self
            .http
            .get(format!("{}/v2/top-headlines", self.base_url))
            .query(&[
                ("country", query.country.as_str()),
                ("category", query.category.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ]);
        let body = send_json(PROVIDER, request).await?;

        if body.get("status").and_then(Value::as_str) == Some("error") {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed");
            return Err(GatewayError::Upstream {
                provider: PROVIDER.to_owned(),
                status: 200,
                message: message.to_owned(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn top_headlines(&self, query: &NewsQuery) -> Result<Value> {
        NewsApiClient::top_headlines(self, query).await
    }
}
