//! Configuration loading for dashgated.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.dashgate/config.toml` (user)
//! 3. `/etc/dashgate/config.toml` (system)
//!
//! When neither default location exists the built-in defaults are used.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.dashgate/secrets.toml` (user, must be 0600)
//! 2. `/etc/dashgate/secrets.toml` (system, must be 0600)
//!
//! Each key falls back to its environment variable when the secrets file
//! does not provide it.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregate::AggregateConfig;
use crate::cache::CacheConfig;
use crate::gateway::GatewayBuilder;
use crate::{GatewayError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub aggregation: AggregationSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3001).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:3001".to_string()
}

/// Cache store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry lifetime in seconds (default: 300).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum number of entries (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_entries() -> u64 {
    10_000
}

impl From<&CacheSection> for CacheConfig {
    fn from(section: &CacheSection) -> Self {
        CacheConfig::new()
            .ttl(Duration::from_secs(section.ttl_secs))
            .max_entries(section.max_entries)
    }
}

/// Upstream HTTP settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub openweather_url: Option<String>,
    #[serde(default)]
    pub alphavantage_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub newsapi_url: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            openweather_url: None,
            alphavantage_url: None,
            github_url: None,
            newsapi_url: None,
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// Fan-out limits. Missing fields take the [`AggregateConfig`] defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregationSection {
    #[serde(default)]
    pub top_repos: Option<usize>,
    #[serde(default)]
    pub detail_concurrency: Option<usize>,
    #[serde(default)]
    pub language_limit: Option<usize>,
    #[serde(default)]
    pub recent_commits: Option<u32>,
}

impl From<&AggregationSection> for AggregateConfig {
    fn from(section: &AggregationSection) -> Self {
        let defaults = AggregateConfig::default();
        AggregateConfig {
            top_repos: section.top_repos.unwrap_or(defaults.top_repos),
            detail_concurrency: section
                .detail_concurrency
                .unwrap_or(defaults.detail_concurrency)
                .max(1),
            language_limit: section.language_limit.unwrap_or(defaults.language_limit),
            recent_commits: section.recent_commits.unwrap_or(defaults.recent_commits),
        }
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openweather: Option<ApiKeySecret>,
    #[serde(default)]
    pub alphavantage: Option<ApiKeySecret>,
    #[serde(default)]
    pub newsapi: Option<ApiKeySecret>,
    #[serde(default)]
    pub github: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("openweather", "OPENWEATHER_API_KEY"),
    ("alphavantage", "ALPHAVANTAGE_API_KEY"),
    ("newsapi", "NEWS_API_KEY"),
    ("github", "GITHUB_TOKEN"),
];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first of
    /// `~/.dashgate/config.toml` and `/etc/dashgate/config.toml` that exists
    /// is used, or the defaults if neither does.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse one config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GatewayError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GatewayError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GatewayError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".dashgate").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/dashgate/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// A gateway builder carrying this configuration and the given secrets.
    pub fn gateway_builder(&self, secrets: &Secrets) -> GatewayBuilder {
        let mut builder = GatewayBuilder::new()
            .timeout(Duration::from_secs(self.upstream.timeout_secs))
            .cache(CacheConfig::from(&self.cache))
            .aggregation(AggregateConfig::from(&self.aggregation));

        if let Some(key) = secrets.api_key("openweather") {
            builder = builder.openweather(key);
        }
        if let Some(key) = secrets.api_key("alphavantage") {
            builder = builder.alphavantage(key);
        }
        if let Some(key) = secrets.api_key("newsapi") {
            builder = builder.newsapi(key);
        }
        if let Some(token) = secrets.api_key("github") {
            builder = builder.github_token(token);
        }

        if let Some(url) = &self.upstream.openweather_url {
            builder = builder.openweather_base_url(url);
        }
        if let Some(url) = &self.upstream.alphavantage_url {
            builder = builder.alphavantage_base_url(url);
        }
        if let Some(url) = &self.upstream.github_url {
            builder = builder.github_base_url(url);
        }
        if let Some(url) = &self.upstream.newsapi_url {
            builder = builder.newsapi_base_url(url);
        }
        builder
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.dashgate/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/dashgate/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".dashgate").join("secrets.toml");
            if user_secrets.exists() {
                return Self::from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/dashgate/secrets.toml");
        if system_secrets.exists() {
            return Self::from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load one secrets file after checking its permissions.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            GatewayError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GatewayError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            GatewayError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(GatewayError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Get the key for a provider, falling back to its environment variable.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        let from_file = match provider {
            "openweather" => self.openweather.as_ref(),
            "alphavantage" => self.alphavantage.as_ref(),
            "newsapi" => self.newsapi.as_ref(),
            "github" => self.github.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == provider)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
                .filter(|key| !key.is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:3001");
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert!(config.upstream.github_url.is_none());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8080"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8080");
        // Defaults preserved
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:3001"

            [cache]
            ttl_secs = 60
            max_entries = 500

            [upstream]
            timeout_secs = 3
            github_url = "http://localhost:9000"

            [aggregation]
            top_repos = 4
            detail_concurrency = 2
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.upstream.timeout_secs, 3);
        assert_eq!(
            config.upstream.github_url.as_deref(),
            Some("http://localhost:9000")
        );

        let cache = CacheConfig::from(&config.cache);
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert_eq!(cache.max_entries, 500);

        let aggregation = AggregateConfig::from(&config.aggregation);
        assert_eq!(aggregation.top_repos, 4);
        assert_eq!(aggregation.detail_concurrency, 2);
        assert_eq!(aggregation.language_limit, 5);
        assert_eq!(aggregation.recent_commits, 10);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let section = AggregationSection {
            detail_concurrency: Some(0),
            ..Default::default()
        };
        assert_eq!(AggregateConfig::from(&section).detail_concurrency, 1);
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [openweather]
            api_key = "ow-test-key"

            [github]
            api_key = "ghp_test"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(
            secrets.openweather.as_ref().unwrap().api_key,
            "ow-test-key"
        );
        assert_eq!(secrets.github.as_ref().unwrap().api_key, "ghp_test");
        assert!(secrets.newsapi.is_none());
    }

    #[test]
    fn api_key_from_secrets() {
        let secrets = Secrets {
            newsapi: Some(ApiKeySecret {
                api_key: "from-file".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(secrets.api_key("newsapi"), Some("from-file".to_string()));
        // Unknown provider returns None
        assert_eq!(secrets.api_key("nonexistent"), None);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }
}
