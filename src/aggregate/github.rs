//! Source-host profile and repo detail aggregation.
//!
//! Profile totals cover every listed repository. Per-repo detail (weekly
//! commit activity and language bytes) is fetched only for the most
//! recently updated top-N, with bounded concurrency, and the language
//! breakdown and project health rows derive from that subset. A repo whose
//! detail calls fail keeps its base fields and is reported in `failures`.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::{StreamExt, stream};
use serde_json::Value;
use tracing::instrument;

use super::{AggregateConfig, Aggregators, endpoint, required};
use crate::Result;
use crate::cache::AggregationRequest;
use crate::providers::SourceHostProvider;
use crate::telemetry;
use crate::types::{
    DetailedRepo, GithubProfile, HealthStatus, LanguageShare, ProjectHealth, Repo, RepoDetail,
    UpstreamFailure,
};

impl Aggregators {
    /// Full profile aggregate for `username`.
    ///
    /// Fails if the user or the repo listing cannot be fetched; per-repo
    /// detail failures only degrade the affected repo.
    #[instrument(skip(self))]
    pub async fn github_profile(&self, username: &str) -> Result<Arc<GithubProfile>> {
        let username = required("username", username)?.to_owned();
        let key = AggregationRequest::new(endpoint::GITHUB_PROFILE)
            .param("username", &username)
            .key();

        let provider = Arc::clone(&self.source_host);
        let config = self.config.clone();
        self.cache
            .compute_if_absent(&key, move || async move {
                build_profile(provider.as_ref(), &username, &config).await
            })
            .await
    }

    /// Repository, its recent commits and its languages.
    #[instrument(skip(self))]
    pub async fn repo_detail(&self, owner: &str, repo: &str) -> Result<Arc<RepoDetail>> {
        let owner = required("username", owner)?.to_owned();
        let repo = required("repo", repo)?.to_owned();
        let key = AggregationRequest::new(endpoint::GITHUB_REPO)
            .param("owner", &owner)
            .param("repo", &repo)
            .key();

        let provider = Arc::clone(&self.source_host);
        let limit = self.config.recent_commits;
        self.cache
            .compute_if_absent(&key, move || async move {
                let host = provider.as_ref();
                let (info, commits, languages) = tokio::join!(
                    host.repo(&owner, &repo),
                    host.commits(&owner, &repo, limit),
                    host.languages(&owner, &repo),
                );
                Ok(RepoDetail {
                    repo: info?,
                    recent_commits: commits?,
                    languages: languages?,
                })
            })
            .await
    }
}

async fn build_profile(
    host: &dyn SourceHostProvider,
    username: &str,
    config: &AggregateConfig,
) -> Result<GithubProfile> {
    let (user, repos) = tokio::join!(host.user(username), host.repos(username));
    let (user, mut repos) = (user?, repos?);

    // The listing is requested sorted by update time; sort again so the
    // top-N does not depend on the provider honouring that.
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let top: Vec<Repo> = repos.iter().take(config.top_repos).cloned().collect();
    let settled: Vec<(DetailedRepo, Option<UpstreamFailure>)> = stream::iter(top)
        .map(|repo| detail_repo(host, username, repo))
        .buffered(config.detail_concurrency.max(1))
        .collect()
        .await;

    let mut detailed = Vec::with_capacity(settled.len());
    let mut failures = Vec::new();
    for (repo, failure) in settled {
        detailed.push(repo);
        failures.extend(failure);
    }
    if !failures.is_empty() {
        metrics::counter!(telemetry::PARTIAL_FAILURES_TOTAL, "aggregate" => "github-profile")
            .increment(failures.len() as u64);
    }

    Ok(summarize_profile(
        user,
        &repos,
        detailed,
        failures,
        config.language_limit,
    ))
}

async fn detail_repo(
    host: &dyn SourceHostProvider,
    owner: &str,
    repo: Repo,
) -> (DetailedRepo, Option<UpstreamFailure>) {
    let (activity, languages) = tokio::join!(
        host.participation(owner, &repo.name),
        host.languages(owner, &repo.name),
    );
    match (activity, languages) {
        (Ok(commit_activity), Ok(languages)) => (
            DetailedRepo {
                repo,
                commit_activity,
                languages,
            },
            None,
        ),
        (Err(err), _) | (_, Err(err)) => {
            let provider = host.name();
            tracing::warn!(
                provider,
                repo = %repo.name,
                error = %err,
                "repo detail failed, using base fields"
            );
            let failure = UpstreamFailure::for_item(&repo.name, &err).or_provider(provider);
            (DetailedRepo::base(repo), Some(failure))
        }
    }
}

/// Assemble the profile from the full listing and the detailed subset.
pub fn summarize_profile(
    user: Value,
    all_repos: &[Repo],
    detailed: Vec<DetailedRepo>,
    failures: Vec<UpstreamFailure>,
    language_limit: usize,
) -> GithubProfile {
    let language_breakdown = language_breakdown(&detailed, language_limit);
    let project_health = project_health(&detailed);

    GithubProfile {
        user,
        total_stars: all_repos.iter().map(|r| r.stargazers_count).sum(),
        total_forks: all_repos.iter().map(|r| r.forks_count).sum(),
        total_watchers: all_repos.iter().map(|r| r.watchers_count).sum(),
        total_issues: all_repos.iter().map(|r| r.open_issues_count).sum(),
        repo_count: all_repos.len(),
        repos: detailed,
        language_breakdown,
        project_health,
        failures,
    }
}

/// Sum language bytes across `repos` and rank them.
///
/// Percentages are shares of the summed total, rounded to one decimal.
/// Only the top `limit` rows are returned and they are not renormalised,
/// so with more than `limit` languages the rows sum to less than 100.
/// Ties in byte count are ordered by name.
pub fn language_breakdown(repos: &[DetailedRepo], limit: usize) -> Vec<LanguageShare> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for repo in repos {
        for (language, bytes) in &repo.languages {
            *totals.entry(language.as_str()).or_default() += bytes;
        }
    }

    let total: u64 = totals.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(name, bytes)| LanguageShare {
            name: name.to_owned(),
            value: format!("{:.1}", bytes as f64 * 100.0 / total as f64),
            bytes,
        })
        .collect()
}

/// One health row per repo, in input order.
pub fn project_health(repos: &[DetailedRepo]) -> Vec<ProjectHealth> {
    repos
        .iter()
        .map(|detailed| {
            let repo = &detailed.repo;
            ProjectHealth {
                name: repo.name.clone(),
                status: HealthStatus::classify(repo.open_issues_count),
                stars: repo.stargazers_count,
                forks: repo.forks_count,
                issues: repo.open_issues_count,
                size: repo.size,
                language: repo.language.clone(),
                description: repo.description.clone(),
                url: repo.html_url.clone(),
                last_commit: repo.updated_at,
            }
        })
        .collect()
}
