//! Source-host (GitHub) records: repositories as listed by the provider,
//! repositories enriched with per-repo detail, and the derived profile.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::UpstreamFailure;

/// A repository as returned by the provider's repo listing.
///
/// Only the fields the gateway derives metrics from are typed; everything
/// else the provider sends is kept in `extra` and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A repository with its weekly commit activity and language byte counts.
///
/// Serializes as the listing fields plus `commitActivity` and `languages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRepo {
    #[serde(flatten)]
    pub repo: Repo,
    pub commit_activity: Vec<u64>,
    pub languages: BTreeMap<String, u64>,
}

impl DetailedRepo {
    /// Base fields only: used when the detail calls for this repo failed.
    pub fn base(repo: Repo) -> Self {
        Self {
            repo,
            commit_activity: Vec::new(),
            languages: BTreeMap::new(),
        }
    }
}

/// One row of the language breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    /// Share of the histogram total, formatted to one decimal place (`"42.5"`).
    pub value: String,
    pub bytes: u64,
}

/// Health classification of a repository by its open issue count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Attention,
}

impl HealthStatus {
    /// Issue count below which a repo is only a warning.
    pub const ATTENTION_THRESHOLD: u64 = 5;

    pub fn classify(open_issues: u64) -> Self {
        match open_issues {
            0 => HealthStatus::Healthy,
            n if n < Self::ATTENTION_THRESHOLD => HealthStatus::Warning,
            _ => HealthStatus::Attention,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHealth {
    pub name: String,
    pub status: HealthStatus,
    pub stars: u64,
    pub forks: u64,
    pub issues: u64,
    pub size: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub last_commit: Option<DateTime<Utc>>,
}

/// Full profile aggregate for one user.
///
/// `totalStars`, `totalForks`, `totalWatchers`, `totalIssues` and `repoCount`
/// cover every listed repository; `repos`, `languageBreakdown` and
/// `projectHealth` cover only the detailed most-recently-updated subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubProfile {
    pub user: Value,
    pub repos: Vec<DetailedRepo>,
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_watchers: u64,
    pub total_issues: u64,
    pub language_breakdown: Vec<LanguageShare>,
    pub project_health: Vec<ProjectHealth>,
    pub repo_count: usize,
    /// Repos whose detail calls failed and were degraded to base fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UpstreamFailure>,
}

/// Single-repository detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoDetail {
    pub repo: Value,
    pub recent_commits: Value,
    pub languages: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_thresholds() {
        assert_eq!(HealthStatus::classify(0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::classify(1), HealthStatus::Warning);
        assert_eq!(HealthStatus::classify(4), HealthStatus::Warning);
        assert_eq!(HealthStatus::classify(5), HealthStatus::Attention);
        assert_eq!(HealthStatus::classify(120), HealthStatus::Attention);
    }

    #[test]
    fn repo_keeps_unknown_fields() {
        let json = serde_json::json!({
            "name": "dashgate",
            "stargazers_count": 3,
            "private": false,
            "owner": { "login": "octo" },
            "updated_at": "2024-12-14T00:00:00Z"
        });
        let repo: Repo = serde_json::from_value(json).unwrap();
        assert_eq!(repo.stargazers_count, 3);
        assert_eq!(repo.forks_count, 0);
        assert_eq!(repo.extra["owner"]["login"], "octo");

        let back = serde_json::to_value(&repo).unwrap();
        assert_eq!(back["private"], false);
        assert_eq!(back["updated_at"], "2024-12-14T00:00:00Z");
    }

    #[test]
    fn detailed_repo_serializes_flat() {
        let repo: Repo = serde_json::from_value(serde_json::json!({ "name": "r" })).unwrap();
        let detailed = DetailedRepo::base(repo);
        let json = serde_json::to_value(&detailed).unwrap();
        assert_eq!(json["name"], "r");
        assert_eq!(json["commitActivity"], serde_json::json!([]));
        assert_eq!(json["languages"], serde_json::json!({}));
    }

    #[test]
    fn health_status_serializes_lowercase() {
        let json = serde_json::to_value(HealthStatus::Attention).unwrap();
        assert_eq!(json, "attention");
    }
}
