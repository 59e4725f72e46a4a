use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::UpstreamFailure;

/// One element of a batch quote response.
///
/// Successful lookups serialize as the raw provider payload, so a batch
/// response looks like a list of single-quote responses. Failed lookups
/// serialize as `{ "symbol": ..., "error": { "provider": ..., "cause": ... } }`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuoteOutcome {
    Quote(Arc<Value>),
    Failed {
        symbol: String,
        error: UpstreamFailure,
    },
}

impl QuoteOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, QuoteOutcome::Failed { .. })
    }

    /// The quote payload, if the lookup succeeded.
    pub fn quote(&self) -> Option<&Value> {
        match self {
            QuoteOutcome::Quote(value) => Some(value),
            QuoteOutcome::Failed { .. } => None,
        }
    }

    /// The failure marker, if the lookup failed.
    pub fn failure(&self) -> Option<&UpstreamFailure> {
        match self {
            QuoteOutcome::Quote(_) => None,
            QuoteOutcome::Failed { error, .. } => Some(error),
        }
    }
}
