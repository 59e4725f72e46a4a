//! Telemetry metric name constants.
//!
//! Centralised metric names for gateway operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `dashgate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: upstream name (e.g. "openweather", "github")
//! - `endpoint`: cache key namespace (e.g. "weather", "github-profile")
//! - `status`: "ok" or "error"

/// Total upstream HTTP requests issued by provider clients.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "dashgate_upstream_requests_total";

/// Upstream request duration in seconds.
///
/// Labels: `provider`.
pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "dashgate_upstream_request_duration_seconds";

/// Total cache hits served by the cache store.
///
/// Labels: `endpoint`.
pub const CACHE_HITS_TOTAL: &str = "dashgate_cache_hits_total";

/// Total cache misses observed by the cache store.
///
/// Labels: `endpoint`.
pub const CACHE_MISSES_TOTAL: &str = "dashgate_cache_misses_total";

/// Callers that joined an already in-flight computation instead of
/// starting their own.
///
/// Labels: `endpoint`.
pub const CACHE_COALESCED_TOTAL: &str = "dashgate_cache_coalesced_total";

/// Sub-fetches that failed inside an aggregation that still succeeded.
///
/// Labels: `aggregate` ("quotes-batch" | "github-profile" | "dashboard").
pub const PARTIAL_FAILURES_TOTAL: &str = "dashgate_partial_failures_total";

/// Extract the endpoint namespace (the part before `:`) of a cache key,
/// used as a low-cardinality metric label.
pub(crate) fn endpoint_label(key: &str) -> String {
    key.split_once(':')
        .map_or(key, |(endpoint, _)| endpoint)
        .to_owned()
}
