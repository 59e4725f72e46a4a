//! Capability traits for upstream providers.
//!
//! Aggregators only see these traits, one per upstream kind, so they can be
//! driven by the HTTP clients in this module or by in-process fakes.
//! Implementations are stateless apart from credentials and a base URL;
//! they never cache.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::types::{NewsQuery, Repo};

/// Current conditions and forecast by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name for logging and failure markers.
    fn name(&self) -> &str;

    async fn current(&self, city: &str) -> Result<Value>;

    async fn forecast(&self, city: &str) -> Result<Value>;
}

/// Equity quotes and daily price series by ticker symbol.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn quote(&self, symbol: &str) -> Result<Value>;

    async fn daily_series(&self, symbol: &str) -> Result<Value>;
}

/// Source-hosting service: users, their repositories and per-repo detail.
#[async_trait]
pub trait SourceHostProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn user(&self, username: &str) -> Result<Value>;

    /// The user's repositories, most recently updated first.
    async fn repos(&self, username: &str) -> Result<Vec<Repo>>;

    async fn repo(&self, owner: &str, repo: &str) -> Result<Value>;

    async fn commits(&self, owner: &str, repo: &str, limit: u32) -> Result<Value>;

    /// Bytes of code per language.
    async fn languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>>;

    /// Weekly commit counts for the last year, oldest first. Empty while the
    /// host is still computing the statistics.
    async fn participation(&self, owner: &str, repo: &str) -> Result<Vec<u64>>;
}

/// Top headlines.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn top_headlines(&self, query: &NewsQuery) -> Result<Value>;
}
