//! Shared HTTP plumbing for the upstream clients.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::telemetry;
use crate::{GatewayError, Result};

/// Per-request timeout applied to every upstream call unless configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("dashgate/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all provider clients.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| GatewayError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Send `request` and parse the body as JSON.
///
/// Non-2xx statuses become [`GatewayError::Upstream`] carrying the
/// provider's own `message` when it sent one. An empty 2xx body parses as
/// `null`. Records request count and duration per provider.
pub(crate) async fn send_json(provider: &'static str, request: RequestBuilder) -> Result<Value> {
    let started = Instant::now();
    let outcome = execute(provider, request).await;

    let status = if outcome.is_ok() { "ok" } else { "error" };
    metrics::counter!(
        telemetry::UPSTREAM_REQUESTS_TOTAL,
        "provider" => provider,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(telemetry::UPSTREAM_REQUEST_DURATION_SECONDS, "provider" => provider)
        .record(started.elapsed().as_secs_f64());

    if let Err(err) = &outcome {
        tracing::warn!(provider, error = %err, "upstream request failed");
    }
    outcome
}

async fn execute(provider: &'static str, request: RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        let message = provider_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
        return Err(GatewayError::Upstream {
            provider: provider.to_owned(),
            status: status.as_u16(),
            message,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|e| GatewayError::Json(format!("{provider}: {e}")))
}

fn transport_error(provider: &'static str, err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout {
            provider: provider.to_owned(),
        }
    } else {
        GatewayError::Http {
            provider: provider.to_owned(),
            message: err.to_string(),
        }
    }
}

/// The `message` field of a provider error body, if the body is JSON.
pub(crate) fn provider_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// The configured API key, or a credentials error for this provider.
pub(crate) fn require_key<'a>(provider: &'static str, key: &'a Option<String>) -> Result<&'a str> {
    key.as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| GatewayError::MissingCredentials {
            provider: provider.to_owned(),
        })
}
