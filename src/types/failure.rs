//! Partial-failure markers embedded in otherwise successful responses.

use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// A sub-fetch that failed while the surrounding aggregation still produced
/// a (degraded) result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    /// Provider that failed (e.g. `"github"`), or `"gateway"` for local errors.
    pub provider: String,
    /// Human-readable cause.
    pub cause: String,
}

/// Provider recorded for errors that carry no provider of their own.
pub const LOCAL_PROVIDER: &str = "gateway";

impl UpstreamFailure {
    pub fn new(provider: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            cause: cause.into(),
        }
    }

    /// Build a failure whose cause names the item (repo, symbol, ...) it belongs to.
    pub fn for_item(item: &str, err: &GatewayError) -> Self {
        let mut failure = Self::from(err);
        failure.cause = format!("{item}: {}", failure.cause);
        failure
    }

    /// Attribute a failure that has no provider of its own (a malformed
    /// body, say) to the provider whose call produced it.
    pub fn or_provider(mut self, provider: &str) -> Self {
        if self.provider == LOCAL_PROVIDER {
            self.provider = provider.to_owned();
        }
        self
    }
}

impl From<&GatewayError> for UpstreamFailure {
    fn from(err: &GatewayError) -> Self {
        Self {
            provider: err.provider().unwrap_or(LOCAL_PROVIDER).to_owned(),
            cause: err.to_string(),
        }
    }
}
