//! HTTP surface tests.
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`,
//! backed by fake providers.

#![cfg(feature = "server")]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use dashgate::providers::{NewsProvider, QuoteProvider, SourceHostProvider, WeatherProvider};
use dashgate::server::router;
use dashgate::{Gateway, GatewayError, NewsQuery, Repo, Result};

// ============================================================================
// Fake providers
// ============================================================================

#[derive(Default)]
struct Weather {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl WeatherProvider for Weather {
    fn name(&self) -> &str {
        "openweather"
    }

    async fn current(&self, city: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Upstream {
                provider: "openweather".into(),
                status: 404,
                message: "city not found".into(),
            });
        }
        Ok(json!({"name": city}))
    }

    async fn forecast(&self, _city: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"list": []}))
    }
}

#[derive(Default)]
struct Quotes {
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteProvider for Quotes {
    fn name(&self) -> &str {
        "alphavantage"
    }

    async fn quote(&self, symbol: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if symbol == "BAD" {
            return Err(GatewayError::Upstream {
                provider: "alphavantage".into(),
                status: 200,
                message: "Invalid API call".into(),
            });
        }
        Ok(json!({"Global Quote": {"01. symbol": symbol}}))
    }

    async fn daily_series(&self, symbol: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"Meta Data": {"2. Symbol": symbol}}))
    }
}

struct Host;

#[async_trait]
impl SourceHostProvider for Host {
    fn name(&self) -> &str {
        "github"
    }

    async fn user(&self, username: &str) -> Result<Value> {
        Ok(json!({"login": username}))
    }

    async fn repos(&self, _username: &str) -> Result<Vec<Repo>> {
        Ok(serde_json::from_value(json!([
            {"name": "gate", "stargazers_count": 4, "open_issues_count": 1}
        ]))?)
    }

    async fn repo(&self, owner: &str, repo: &str) -> Result<Value> {
        Ok(json!({"full_name": format!("{owner}/{repo}")}))
    }

    async fn commits(&self, _owner: &str, _repo: &str, _limit: u32) -> Result<Value> {
        Ok(json!([]))
    }

    async fn languages(&self, _owner: &str, _repo: &str) -> Result<BTreeMap<String, u64>> {
        Ok(BTreeMap::from([("Rust".to_string(), 10)]))
    }

    async fn participation(&self, _owner: &str, _repo: &str) -> Result<Vec<u64>> {
        Ok(vec![0, 1])
    }
}

#[derive(Default)]
struct News {
    calls: AtomicUsize,
}

#[async_trait]
impl NewsProvider for News {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn top_headlines(&self, query: &NewsQuery) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"status": "ok", "pageSize": query.page_size, "articles": []}))
    }
}

struct Harness {
    app: Router,
    weather: Arc<Weather>,
    quotes: Arc<Quotes>,
    news: Arc<News>,
}

fn harness_with(weather: Weather) -> Harness {
    let weather = Arc::new(weather);
    let quotes = Arc::new(Quotes::default());
    let news = Arc::new(News::default());
    let gateway = Gateway::builder()
        .weather_provider(weather.clone())
        .quote_provider(quotes.clone())
        .source_host_provider(Arc::new(Host))
        .news_provider(news.clone())
        .build()
        .unwrap();
    Harness {
        app: router(Arc::new(gateway)),
        weather,
        quotes,
        news,
    }
}

fn harness() -> Harness {
    harness_with(Weather::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(app, request).await
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn weather_returns_merged_report() {
    let h = harness();

    let (status, body) = get(&h.app, "/api/weather/Toronto").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current"]["name"], "Toronto");
    assert_eq!(body["forecast"]["list"], json!([]));
}

#[tokio::test]
async fn upstream_failure_uses_endpoint_category() {
    let h = harness_with(Weather {
        fail: true,
        ..Default::default()
    });

    let (status, body) = get(&h.app, "/api/weather/Atlantis").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch weather data");
    assert!(body["message"].as_str().unwrap().contains("city not found"));
}

#[tokio::test]
async fn stats_and_clear_reflect_cache_contents() {
    let h = harness();

    get(&h.app, "/api/weather/Toronto").await;
    get(&h.app, "/api/weather/Toronto").await;

    let (status, stats) = get(&h.app, "/api/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["keys"], json!(["weather:city=Toronto"]));
    assert_eq!(stats["stats"]["keyCount"], 1);
    assert_eq!(stats["stats"]["hits"], 1);
    assert_eq!(h.weather.calls.load(Ordering::SeqCst), 2);

    let (status, cleared) = send(
        &h.app,
        Request::post("/api/cache/clear").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["message"], "Cache cleared successfully");

    let (_, stats) = get(&h.app, "/api/cache/stats").await;
    assert_eq!(stats["keys"], json!([]));
    assert_eq!(stats["stats"]["keyCount"], 0);

    // Cleared entries are recomputed.
    get(&h.app, "/api/weather/Toronto").await;
    assert_eq!(h.weather.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn batch_rejects_malformed_bodies_without_upstream_calls() {
    let h = harness();

    for body in [
        r#"{"symbols":[]}"#,
        r#"{"symbols":"AAPL"}"#,
        r#"{}"#,
        "nope",
        r#"{"symbols":["AAPL"," "]}"#,
    ] {
        let (status, json) = post_json(&h.app, "/api/stocks/batch", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json["error"], "Invalid symbols array", "body {body}");
    }
    assert_eq!(h.quotes.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_partial_failure_is_still_ok() {
    let h = harness();

    let (status, body) =
        post_json(&h.app, "/api/stocks/batch", r#"{"symbols":["aapl","BAD"]}"#).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["Global Quote"]["01. symbol"], "AAPL");
    assert_eq!(items[1]["symbol"], "BAD");
    assert_eq!(items[1]["error"]["provider"], "alphavantage");
}

#[tokio::test]
async fn stock_routes_do_not_collide() {
    let h = harness();

    let (status, quote) = get(&h.app, "/api/stocks/msft").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["Global Quote"]["01. symbol"], "MSFT");

    let (status, history) = get(&h.app, "/api/stocks/msft/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["Meta Data"]["2. Symbol"], "MSFT");

    let (status, _) = get(&h.app, "/api/stocks/batch").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn github_user_and_repo_routes_are_distinct() {
    let h = harness();

    let (status, profile) = get(&h.app, "/api/github/user/octo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user"]["login"], "octo");
    assert_eq!(profile["totalStars"], 4);
    assert_eq!(profile["languageBreakdown"][0]["name"], "Rust");
    assert_eq!(profile["languageBreakdown"][0]["value"], "100.0");
    assert_eq!(profile["projectHealth"][0]["status"], "warning");

    let (status, detail) = get(&h.app, "/api/github/octo/gate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["repo"]["full_name"], "octo/gate");
    assert_eq!(detail["recentCommits"], json!([]));
}

#[tokio::test]
async fn news_params_are_validated_and_keyed() {
    let h = harness();

    let (status, body) = get(&h.app, "/api/news?pageSize=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request");
    assert_eq!(h.news.calls.load(Ordering::SeqCst), 0);

    let (status, body) = get(&h.app, "/api/news?category=business&pageSize=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageSize"], 5);

    get(&h.app, "/api/news").await;
    get(&h.app, "/api/news?category=Business&pageSize=5").await;
    assert_eq!(h.news.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_query_gets_json_envelope() {
    let h = harness();

    for uri in [
        "/api/news?category=a&category=b",
        "/api/dashboard/octo?city=a&city=b",
    ] {
        let (status, body) = get(&h.app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body["error"], "Invalid request", "uri {uri}");
        assert!(
            body["message"].as_str().is_some_and(|m| !m.is_empty()),
            "uri {uri}"
        );
    }
    assert_eq!(h.news.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_path_segment_gets_json_envelope() {
    let h = harness();

    let (status, body) = get(&h.app, "/api/weather/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dashboard_combines_sections() {
    let h = harness();

    let (status, body) = get(&h.app, "/api/dashboard/octo?city=Oslo&stocks=ibm,BAD").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weather"]["current"]["name"], "Oslo");
    assert_eq!(body["github"]["user"]["login"], "octo");
    assert_eq!(body["news"]["status"], "ok");
    assert_eq!(body["stocks"][0]["Global Quote"]["01. symbol"], "IBM");
    assert_eq!(body["stocks"][1]["error"]["provider"], "alphavantage");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let h = harness();

    let (status, body) = get(&h.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["version"], dashgate::PKG_VERSION);
    assert_eq!(body["inFlight"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let h = harness();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/weather/Toronto")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
