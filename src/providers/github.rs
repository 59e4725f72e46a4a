//! GitHub REST API client.
//!
//! Works unauthenticated (60 requests/hour); a token raises the limit and
//! is sent as a bearer token on every request.
//! See: <https://docs.github.com/en/rest>

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::http::send_json;
use super::traits::SourceHostProvider;
use crate::types::Repo;
use crate::{GatewayError, Result};

const PROVIDER: &str = "github";

/// Default base URL for the GitHub REST API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repositories requested per listing page.
const REPOS_PER_PAGE: &str = "100";

#[derive(Clone)]
pub struct GithubClient {
    token: Option<String>,
    http: Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(http: Client, token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Point the client at a different host (for testing with wiremock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn user(&self, username: &str) -> Result<Value> {
        self.get(&["users", username], &[]).await
    }

    /// First page (up to 100) of the user's repositories, most recently
    /// updated first.
    pub async fn repos(&self, username: &str) -> Result<Vec<Repo>> {
        let body = self
            .get(
                &["users", username, "repos"],
                &[("per_page", REPOS_PER_PAGE), ("sort", "updated")],
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn repo(&self, owner: &str, repo: &str) -> Result<Value> {
        self.get(&["repos", owner, repo], &[]).await
    }

    pub async fn commits(&self, owner: &str, repo: &str, limit: u32) -> Result<Value> {
        let per_page = limit.to_string();
        self.get(
            &["repos", owner, repo, "commits"],
            &[("per_page", per_page.as_str())],
        )
        .await
    }

    pub async fn languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>> {
        let body = self.get(&["repos", owner, repo, "languages"], &[]).await?;
        if body.is_null() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Weekly commit counts (`all`) from the participation statistics.
    ///
    /// GitHub answers 202 with an empty body while it computes the
    /// statistics; that is reported as an empty series.
    pub async fn participation(&self, owner: &str, repo: &str) -> Result<Vec<u64>> {
        let body = self
            .get(&["repos", owner, repo, "stats", "participation"], &[])
            .await?;
        match body.get("all") {
            Some(all) => Ok(serde_json::from_value(all.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GatewayError::Internal(format!("invalid GitHub base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::Internal("GitHub base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value> {
        let mut request = self
            .http
            .get(self.url(segments)?)
            .header("Accept", "application/vnd.github+json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        send_json(PROVIDER, request).await
    }
}

#[async_trait]
impl SourceHostProvider for GithubClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn user(&self, username: &str) -> Result<Value> {
        GithubClient::user(self, username).await
    }

    async fn repos(&self, username: &str) -> Result<Vec<Repo>> {
        GithubClient::repos(self, username).await
    }

    async fn repo(&self, owner: &str, repo: &str) -> Result<Value> {
        GithubClient::repo(self, owner, repo).await
    }

    async fn commits(&self, owner: &str, repo: &str, limit: u32) -> Result<Value> {
        GithubClient::commits(self, owner, repo, limit).await
    }

    async fn languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>> {
        GithubClient::languages(self, owner, repo).await
    }

    async fn participation(&self, owner: &str, repo: &str) -> Result<Vec<u64>> {
        GithubClient::participation(self, owner, repo).await
    }
}
