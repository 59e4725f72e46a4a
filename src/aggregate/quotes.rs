use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::instrument;

use super::{Aggregators, endpoint, required};
use crate::cache::AggregationRequest;
use crate::telemetry;
use crate::types::{QuoteOutcome, UpstreamFailure};
use crate::{GatewayError, Result};

impl Aggregators {
    /// Latest quote for one symbol.
    #[instrument(skip(self))]
    pub async fn quote(&self, symbol: &str) -> Result<Arc<Value>> {
        let symbol = normalize_symbol(symbol)?;
        let key = AggregationRequest::new(endpoint::STOCK)
            .param("symbol", &symbol)
            .key();

        let provider = Arc::clone(&self.quotes);
        self.cache
            .compute_if_absent(&key, move || async move { provider.quote(&symbol).await })
            .await
    }

    /// Daily price series for one symbol.
    #[instrument(skip(self))]
    pub async fn daily_series(&self, symbol: &str) -> Result<Arc<Value>> {
        let symbol = normalize_symbol(symbol)?;
        let key = AggregationRequest::new(endpoint::STOCK_HISTORY)
            .param("symbol", &symbol)
            .key();

        let provider = Arc::clone(&self.quotes);
        self.cache
            .compute_if_absent(&key, move || async move {
                provider.daily_series(&symbol).await
            })
            .await
    }

    /// Quotes for several symbols, each cached on its own.
    ///
    /// Fails only on invalid input (an empty list or a blank symbol), before
    /// any upstream call. A symbol whose lookup fails yields a
    /// [`QuoteOutcome::Failed`] in its position; the others are unaffected.
    #[instrument(skip(self), fields(count = symbols.len()))]
    pub async fn quotes(&self, symbols: &[String]) -> Result<Vec<QuoteOutcome>> {
        if symbols.is_empty() {
            return Err(GatewayError::InvalidInput(
                "symbols must be a non-empty array".into(),
            ));
        }
        let symbols = symbols
            .iter()
            .map(|s| normalize_symbol(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.quote_outcomes(&symbols, "quotes-batch").await)
    }

    /// Fan out one cached lookup per already-normalized symbol.
    pub(crate) async fn quote_outcomes(
        &self,
        symbols: &[String],
        aggregate: &'static str,
    ) -> Vec<QuoteOutcome> {
        let results = join_all(symbols.iter().map(|symbol| self.quote(symbol))).await;

        symbols
            .iter()
            .zip(results)
            .map(|(symbol, result)| match result {
                Ok(quote) => QuoteOutcome::Quote(quote),
                Err(err) => {
                    let provider = self.quotes.name();
                    tracing::warn!(provider, symbol = %symbol, error = %err, "quote lookup failed");
                    metrics::counter!(telemetry::PARTIAL_FAILURES_TOTAL, "aggregate" => aggregate)
                        .increment(1);
                    QuoteOutcome::Failed {
                        symbol: symbol.clone(),
                        error: UpstreamFailure::from(&err).or_provider(provider),
                    }
                }
            })
            .collect()
    }
}

/// Ticker symbols are case-insensitive; keys and upstream calls use the
/// trimmed upper-case form.
pub(crate) fn normalize_symbol(symbol: &str) -> Result<String> {
    Ok(required("symbol", symbol)?.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_upper_cased() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert!(normalize_symbol("").unwrap_err().is_validation());
    }
}
