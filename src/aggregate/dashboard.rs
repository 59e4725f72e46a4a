use chrono::Utc;
use tracing::instrument;

use super::quotes::normalize_symbol;
use super::{Aggregators, required};
use crate::Result;
use crate::telemetry;
use crate::types::{Dashboard, DashboardQuery, NewsQuery, Section};

impl Aggregators {
    /// Weather, profile, headlines and quotes for one dashboard load.
    ///
    /// Each section goes through the cache on its own key, so it shares
    /// entries with the individual endpoints. A failed section is reported
    /// in place and never fails the dashboard; only invalid input does.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, username: &str, query: &DashboardQuery) -> Result<Dashboard> {
        let username = required("username", username)?;
        let city = required("city", &query.city)?;
        let symbols = query
            .stocks
            .iter()
            .map(|s| normalize_symbol(s))
            .collect::<Result<Vec<_>>>()?;
        let headlines = NewsQuery::default();

        let (weather, github, news, stocks) = tokio::join!(
            self.weather(city),
            self.github_profile(username),
            self.news(&headlines),
            self.quote_outcomes(&symbols, "dashboard"),
        );

        let dashboard = Dashboard {
            weather: Section::from(weather),
            github: Section::from(github),
            news: Section::from(news),
            stocks,
            timestamp: Utc::now(),
        };

        let failed = dashboard.failed_sections();
        if !failed.is_empty() {
            tracing::warn!(?failed, "dashboard served with failed sections");
            metrics::counter!(telemetry::PARTIAL_FAILURES_TOTAL, "aggregate" => "dashboard")
                .increment(failed.len() as u64);
        }
        Ok(dashboard)
    }
}
