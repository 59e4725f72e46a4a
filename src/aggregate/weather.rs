use std::sync::Arc;

use tracing::instrument;

use super::{Aggregators, endpoint, required};
use crate::Result;
use crate::cache::AggregationRequest;
use crate::providers::WeatherProvider;
use crate::types::WeatherReport;

impl Aggregators {
    /// Current conditions and forecast for `city`. Fails if either half fails.
    #[instrument(skip(self))]
    pub async fn weather(&self, city: &str) -> Result<Arc<WeatherReport>> {
        let city = required("city", city)?.to_owned();
        let key = AggregationRequest::new(endpoint::WEATHER)
            .param("city", &city)
            .key();

        let provider = Arc::clone(&self.weather);
        self.cache
            .compute_if_absent(&key, move || async move {
                fetch_weather(provider.as_ref(), &city).await
            })
            .await
    }
}

async fn fetch_weather(provider: &dyn WeatherProvider, city: &str) -> Result<WeatherReport> {
    let (current, forecast) = tokio::join!(provider.current(city), provider.forecast(city));
    Ok(WeatherReport::merge(current?, forecast?))
}
