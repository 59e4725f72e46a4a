use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use super::{Aggregators, endpoint};
use crate::Result;
use crate::cache::AggregationRequest;
use crate::types::NewsQuery;

impl Aggregators {
    /// Top headlines for one category/country/page-size slice.
    #[instrument(skip(self))]
    pub async fn news(&self, query: &NewsQuery) -> Result<Arc<Value>> {
        let key = AggregationRequest::new(endpoint::NEWS)
            .param("category", &query.category)
            .param("country", &query.country)
            .param("pageSize", query.page_size)
            .key();

        let provider = Arc::clone(&self.news);
        let query = query.clone();
        self.cache
            .compute_if_absent(&key, move || async move {
                provider.top_headlines(&query).await
            })
            .await
    }
}
