//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::Gateway;
use crate::Result;
use crate::aggregate::{AggregateConfig, Aggregators};
use crate::cache::{CacheConfig, CacheStore, CacheThrough};
use crate::providers::http::{DEFAULT_TIMEOUT, build_client};
use crate::providers::{
    AlphaVantageClient, GithubClient, NewsApiClient, NewsProvider, OpenWeatherClient,
    QuoteProvider, SourceHostProvider, WeatherProvider,
};

/// Builder for [`Gateway`].
///
/// Every provider is optional. A provider without credentials still gets a
/// client; its calls fail with `MissingCredentials` and the endpoints that
/// depend on it answer with an error (or a failed dashboard section).
/// GitHub works without a token at a lower rate limit.
pub struct GatewayBuilder {
    openweather_key: Option<String>,
    alphavantage_key: Option<String>,
    newsapi_key: Option<String>,
    github_token: Option<String>,
    openweather_url: Option<String>,
    alphavantage_url: Option<String>,
    github_url: Option<String>,
    newsapi_url: Option<String>,
    timeout: Duration,
    cache: CacheConfig,
    aggregation: AggregateConfig,
    weather_provider: Option<Arc<dyn WeatherProvider>>,
    quote_provider: Option<Arc<dyn QuoteProvider>>,
    source_host_provider: Option<Arc<dyn SourceHostProvider>>,
    news_provider: Option<Arc<dyn NewsProvider>>,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self {
            openweather_key: None,
            alphavantage_key: None,
            newsapi_key: None,
            github_token: None,
            openweather_url: None,
            alphavantage_url: None,
            github_url: None,
            newsapi_url: None,
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
            aggregation: AggregateConfig::default(),
            weather_provider: None,
            quote_provider: None,
            source_host_provider: None,
            news_provider: None,
        }
    }

    /// Configure the OpenWeather API key.
    pub fn openweather(mut self, api_key: impl Into<String>) -> Self {
        self.openweather_key = Some(api_key.into());
        self
    }

    /// Configure the Alpha Vantage API key.
    pub fn alphavantage(mut self, api_key: impl Into<String>) -> Self {
        self.alphavantage_key = Some(api_key.into());
        self
    }

    /// Configure the NewsAPI key.
    pub fn newsapi(mut self, api_key: impl Into<String>) -> Self {
        self.newsapi_key = Some(api_key.into());
        self
    }

    /// Configure a GitHub token (optional; raises the rate limit).
    pub fn github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Override the OpenWeather host.
    pub fn openweather_base_url(mut self, url: impl Into<String>) -> Self {
        self.openweather_url = Some(url.into());
        self
    }

    /// Override the Alpha Vantage host.
    pub fn alphavantage_base_url(mut self, url: impl Into<String>) -> Self {
        self.alphavantage_url = Some(url.into());
        self
    }

    /// Override the GitHub API host.
    pub fn github_base_url(mut self, url: impl Into<String>) -> Self {
        self.github_url = Some(url.into());
        self
    }

    /// Override the NewsAPI host.
    pub fn newsapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.newsapi_url = Some(url.into());
        self
    }

    /// Per-request timeout for upstream calls (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cache capacity and TTL.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Fan-out and derivation limits.
    pub fn aggregation(mut self, config: AggregateConfig) -> Self {
        self.aggregation = config;
        self
    }

    /// Use a custom weather provider instead of the OpenWeather client.
    pub fn weather_provider(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather_provider = Some(provider);
        self
    }

    /// Use a custom quote provider instead of the Alpha Vantage client.
    pub fn quote_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.quote_provider = Some(provider);
        self
    }

    /// Use a custom source-host provider instead of the GitHub client.
    pub fn source_host_provider(mut self, provider: Arc<dyn SourceHostProvider>) -> Self {
        self.source_host_provider = Some(provider);
        self
    }

    /// Use a custom news provider instead of the NewsAPI client.
    pub fn news_provider(mut self, provider: Arc<dyn NewsProvider>) -> Self {
        self.news_provider = Some(provider);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<Gateway> {
        let http = build_client(self.timeout)?;

        let weather = match self.weather_provider {
            Some(provider) => provider,
            None => {
                warn_if_missing("openweather", &self.openweather_key);
                let mut client = OpenWeatherClient::new(http.clone(), self.openweather_key);
                if let Some(url) = self.openweather_url {
                    client = client.with_base_url(url);
                }
                Arc::new(client)
            }
        };

        let quotes = match self.quote_provider {
            Some(provider) => provider,
            None => {
                warn_if_missing("alphavantage", &self.alphavantage_key);
                let mut client = AlphaVantageClient::new(http.clone(), self.alphavantage_key);
                if let Some(url) = self.alphavantage_url {
                    client = client.with_base_url(url);
                }
                Arc::new(client)
            }
        };

        let source_host = match self.source_host_provider {
            Some(provider) => provider,
            None => {
                if self.github_token.is_none() {
                    tracing::info!("no GitHub token configured, using unauthenticated rate limit");
                }
                let mut client = GithubClient::new(http.clone(), self.github_token);
                if let Some(url) = self.github_url {
                    client = client.with_base_url(url);
                }
                Arc::new(client)
            }
        };

        let news = match self.news_provider {
            Some(provider) => provider,
            None => {
                warn_if_missing("newsapi", &self.newsapi_key);
                let mut client = NewsApiClient::new(http, self.newsapi_key);
                if let Some(url) = self.newsapi_url {
                    client = client.with_base_url(url);
                }
                Arc::new(client)
            }
        };

        let store = Arc::new(CacheStore::new(&self.cache));
        let cache = CacheThrough::new(Arc::clone(&store));
        let aggregators = Aggregators::new(
            cache,
            weather,
            quotes,
            source_host,
            news,
            self.aggregation,
        );

        Ok(Gateway::new(store, aggregators))
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_if_missing(provider: &str, key: &Option<String>) {
    if key.as_deref().is_none_or(str::is_empty) {
        tracing::warn!(provider, "API key not configured, requests to this provider will fail");
    }
}
