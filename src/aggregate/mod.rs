//! Per-endpoint aggregation.
//!
//! [`Aggregators`] owns the provider handles and the cache-through executor.
//! Every public method validates its input, derives the canonical cache key
//! and hands a producer to [`CacheThrough::compute_if_absent`]; the producer
//! does the provider fan-out and derivation only on a miss.
//!
//! Fan-outs always wait for every launched call to settle (`tokio::join!`,
//! `join_all`, ordered `buffered` streams) before merging.

mod dashboard;
mod github;
mod news;
mod quotes;
mod weather;

use std::sync::Arc;

pub use github::{language_breakdown, project_health, summarize_profile};

use crate::cache::CacheThrough;
use crate::providers::{NewsProvider, QuoteProvider, SourceHostProvider, WeatherProvider};
use crate::{GatewayError, Result};

/// Endpoint ids used as cache key namespaces.
pub mod endpoint {
    pub const WEATHER: &str = "weather";
    pub const STOCK: &str = "stock";
    pub const STOCK_HISTORY: &str = "stock-history";
    pub const GITHUB_PROFILE: &str = "github-profile";
    pub const GITHUB_REPO: &str = "github-repo";
    pub const NEWS: &str = "news";
}

/// Fan-out and derivation limits.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Most-recently-updated repos that get per-repo detail. Default: 10.
    pub top_repos: usize,
    /// Per-repo detail fetches running at once. Default: 5.
    pub detail_concurrency: usize,
    /// Rows kept in the language breakdown. Default: 5.
    pub language_limit: usize,
    /// Commits included in a repo detail. Default: 10.
    pub recent_commits: u32,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            top_repos: 10,
            detail_concurrency: 5,
            language_limit: 5,
            recent_commits: 10,
        }
    }
}

/// Entry points for every aggregated endpoint. Cheap to clone.
#[derive(Clone)]
pub struct Aggregators {
    cache: CacheThrough,
    weather: Arc<dyn WeatherProvider>,
    quotes: Arc<dyn QuoteProvider>,
    source_host: Arc<dyn SourceHostProvider>,
    news: Arc<dyn NewsProvider>,
    config: AggregateConfig,
}

impl Aggregators {
    pub fn new(
        cache: CacheThrough,
        weather: Arc<dyn WeatherProvider>,
        quotes: Arc<dyn QuoteProvider>,
        source_host: Arc<dyn SourceHostProvider>,
        news: Arc<dyn NewsProvider>,
        config: AggregateConfig,
    ) -> Self {
        Self {
            cache,
            weather,
            quotes,
            source_host,
            news,
            config,
        }
    }

    pub fn cache(&self) -> &CacheThrough {
        &self.cache
    }

    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }
}

/// Trimmed value of a required parameter, or a validation error naming it.
pub(crate) fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GatewayError::InvalidInput(format!("{name} is required")));
    }
    Ok(value)
}
