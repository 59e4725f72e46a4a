//! Gateway error types

/// Gateway error types.
///
/// Errors are `Clone` so that a single failed computation can be handed to
/// every caller that was waiting on it (see [`CacheThrough`](crate::cache::CacheThrough)).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    // Request errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Provider/network errors
    #[error("{provider} API error ({status}): {message}")]
    Upstream {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} HTTP error: {message}")]
    Http { provider: String, message: String },

    #[error("{provider} request timed out")]
    Timeout { provider: String },

    #[error("{provider} is not configured: missing API key")]
    MissingCredentials { provider: String },

    // Setup errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Whether this error was caused by bad caller input (surfaced as 400).
    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::InvalidInput(_))
    }

    /// Name of the upstream provider that produced this error, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            GatewayError::Upstream { provider, .. }
            | GatewayError::Http { provider, .. }
            | GatewayError::Timeout { provider }
            | GatewayError::MissingCredentials { provider } => Some(provider),
            _ => None,
        }
    }

    /// HTTP status returned by the upstream, when one was received.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GatewayError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Json(err.to_string())
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
