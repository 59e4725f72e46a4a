//! Response records produced by the aggregators.
//!
//! Every endpoint returns an explicit record type rather than an untyped
//! JSON bag. Provider payloads the gateway passes through untouched
//! (quotes, daily series, news, user profiles) stay as
//! [`serde_json::Value`] inside those records.

pub mod dashboard;
pub mod failure;
pub mod github;
pub mod news;
pub mod quote;
pub mod weather;

pub use dashboard::{Dashboard, DashboardQuery, Section};
pub use failure::UpstreamFailure;
pub use github::{
    DetailedRepo, GithubProfile, HealthStatus, LanguageShare, ProjectHealth, Repo, RepoDetail,
};
pub use news::NewsQuery;
pub use quote::QuoteOutcome;
pub use weather::WeatherReport;
