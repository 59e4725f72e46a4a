//! Upstream provider clients.
//!
//! One client per provider, each implementing the matching capability trait
//! from [`traits`]. All clients share one [`reqwest::Client`] built by
//! [`http::build_client`].

pub mod alphavantage;
pub mod github;
pub mod http;
pub mod newsapi;
pub mod openweather;
pub mod traits;

pub use alphavantage::AlphaVantageClient;
pub use github::GithubClient;
pub use newsapi::NewsApiClient;
pub use openweather::OpenWeatherClient;
pub use traits::{NewsProvider, QuoteProvider, SourceHostProvider, WeatherProvider};
