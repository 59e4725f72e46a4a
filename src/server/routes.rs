//! HTTP routes.
//!
//! Handlers validate input, call into [`Aggregators`](crate::Aggregators)
//! and map failures onto the [`ApiError`] envelope. No handler talks to a
//! provider directly.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::{ApiError, ApiResult, INVALID_SYMBOLS};
use super::extract::{ApiPath, ApiQuery};
use crate::gateway::{CacheReport, Gateway, HealthReport};
use crate::types::{
    Dashboard, DashboardQuery, GithubProfile, NewsQuery, QuoteOutcome, RepoDetail, WeatherReport,
};

/// Build the router for `gateway`.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/api/weather/{city}", get(weather))
        .route("/api/stocks/batch", post(stocks_batch))
        .route("/api/stocks/{symbol}", get(stock))
        .route("/api/stocks/{symbol}/history", get(stock_history))
        .route("/api/github/user/{username}", get(github_profile))
        .route("/api/github/{username}/{repo}", get(github_repo))
        .route("/api/news", get(news))
        .route("/api/dashboard/{username}", get(dashboard))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/clear", post(cache_clear))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

type Shared = State<Arc<Gateway>>;

async fn weather(
    State(gateway): Shared,
    ApiPath(city): ApiPath<String>,
) -> ApiResult<Json<Arc<WeatherReport>>> {
    gateway
        .aggregators()
        .weather(&city)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway("Failed to fetch weather data", e))
}

async fn stock(
    State(gateway): Shared,
    ApiPath(symbol): ApiPath<String>,
) -> ApiResult<Json<Arc<Value>>> {
    gateway
        .aggregators()
        .quote(&symbol)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway("Failed to fetch stock data", e))
}

async fn stock_history(
    State(gateway): Shared,
    ApiPath(symbol): ApiPath<String>,
) -> ApiResult<Json<Arc<Value>>> {
    gateway
        .aggregators()
        .daily_series(&symbol)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway("Failed to fetch stock history", e))
}

/// The body is parsed by hand so a malformed one gets the envelope rather
/// than the extractor's plain-text rejection.
async fn stocks_batch(State(gateway): Shared, body: Bytes) -> ApiResult<Json<Vec<QuoteOutcome>>> {
    let symbols = parse_symbols(&body).ok_or_else(|| {
        ApiError::bad_request(
            INVALID_SYMBOLS,
            "symbols must be a non-empty array of strings",
        )
    })?;

    gateway
        .aggregators()
        .quotes(&symbols)
        .await
        .map(Json)
        .map_err(|e| {
            if e.is_validation() {
                ApiError::bad_request(INVALID_SYMBOLS, e.to_string())
            } else {
                ApiError::from_gateway("Failed to fetch batch stock data", e)
            }
        })
}

fn parse_symbols(body: &[u8]) -> Option<Vec<String>> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let items = value.get("symbols")?.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}

async fn github_profile(
    State(gateway): Shared,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Json<Arc<GithubProfile>>> {
    gateway
        .aggregators()
        .github_profile(&username)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway("Failed to fetch GitHub data", e))
}

async fn github_repo(
    State(gateway): Shared,
    ApiPath((username, repo)): ApiPath<(String, String)>,
) -> ApiResult<Json<Arc<RepoDetail>>> {
    gateway
        .aggregators()
        .repo_detail(&username, &repo)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway("Failed to fetch repository data", e))
}

#[derive(Debug, Default, Deserialize)]
struct NewsParams {
    category: Option<String>,
    country: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

async fn news(
    State(gateway): Shared,
    ApiQuery(params): ApiQuery<NewsParams>,
) -> ApiResult<Json<Arc<Value>>> {
    const CATEGORY: &str = "Failed to fetch news data";

    let query = NewsQuery::from_params(
        params.category.as_deref(),
        params.country.as_deref(),
        params.page_size.as_deref(),
    )
    .map_err(|e| ApiError::from_gateway(CATEGORY, e))?;

    gateway
        .aggregators()
        .news(&query)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway(CATEGORY, e))
}

#[derive(Debug, Default, Deserialize)]
struct DashboardParams {
    city: Option<String>,
    stocks: Option<String>,
}

async fn dashboard(
    State(gateway): Shared,
    ApiPath(username): ApiPath<String>,
    ApiQuery(params): ApiQuery<DashboardParams>,
) -> ApiResult<Json<Dashboard>> {
    let query = DashboardQuery::from_params(params.city.as_deref(), params.stocks.as_deref());
    gateway
        .aggregators()
        .dashboard(&username, &query)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway("Failed to fetch dashboard data", e))
}

async fn cache_stats(State(gateway): Shared) -> Json<CacheReport> {
    Json(gateway.cache_report())
}

#[derive(Serialize)]
struct Cleared {
    message: &'static str,
}

async fn cache_clear(State(gateway): Shared) -> Json<Cleared> {
    gateway.clear_cache();
    Json(Cleared {
        message: "Cache cleared successfully",
    })
}

async fn health(State(gateway): Shared) -> Json<HealthReport> {
    Json(gateway.health())
}
