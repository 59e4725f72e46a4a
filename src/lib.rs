//! dashgate: cache-through aggregation gateway for dashboard data
//!
//! The gateway sits between a dashboard client and a handful of upstream
//! data providers (OpenWeather, Alpha Vantage, GitHub, NewsAPI). Each
//! endpoint fans out to one or more providers in parallel, merges the
//! results into a typed response record and memoizes it briefly so that
//! repeated dashboard loads do not hammer rate-limited upstreams.
//!
//! The moving parts, leaf first:
//!
//! - [`providers`]: one reqwest client per upstream behind a capability trait
//! - [`cache::CacheStore`]: in-memory TTL store with hit/miss counters
//! - [`cache::CacheThrough`]: compute-if-absent with per-key in-flight
//!   deduplication
//! - [`aggregate::Aggregators`]: per-endpoint fan-out and derivation
//! - [`Gateway`]: the explicitly constructed object graph served over HTTP
//!   by [`server`] (requires the `server` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use dashgate::Gateway;
//!
//! #[tokio::main]
//! async fn main() -> dashgate::Result<()> {
//!     let gateway = Gateway::builder()
//!         .openweather("your-openweather-key")
//!         .build()?;
//!
//!     let report = gateway.aggregators().weather("Toronto").await?;
//!     println!("{}", report.current["main"]["temp"]);
//!
//!     // Served from cache for the next five minutes.
//!     let _again = gateway.aggregators().weather("Toronto").await?;
//!     println!("{:?}", gateway.store().stats());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod gateway;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use aggregate::{AggregateConfig, Aggregators};
pub use cache::{AggregationRequest, CacheConfig, CacheKey, CacheStats, CacheStore, CacheThrough};
pub use error::{GatewayError, Result};
pub use gateway::{CacheReport, Gateway, GatewayBuilder, HealthReport};

pub use types::{
    Dashboard, DashboardQuery, DetailedRepo, GithubProfile, HealthStatus, LanguageShare, NewsQuery,
    ProjectHealth, QuoteOutcome, Repo, RepoDetail, Section, UpstreamFailure, WeatherReport,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
