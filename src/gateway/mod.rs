//! The assembled gateway: one cache store, one executor, one set of clients.

mod builder;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use builder::GatewayBuilder;

use crate::aggregate::Aggregators;
use crate::cache::{CacheStats, CacheStore};

/// Snapshot of the cache contents.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub keys: Vec<String>,
    pub stats: CacheStats,
}

/// Liveness report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    /// Computations currently in flight.
    pub in_flight: usize,
    pub cache: CacheReport,
}

/// Explicitly constructed gateway. Share it behind an `Arc`.
pub struct Gateway {
    store: Arc<CacheStore>,
    aggregators: Aggregators,
}

impl Gateway {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    pub(crate) fn new(store: Arc<CacheStore>, aggregators: Aggregators) -> Self {
        Self { store, aggregators }
    }

    pub fn aggregators(&self) -> &Aggregators {
        &self.aggregators
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn cache_report(&self) -> CacheReport {
        CacheReport {
            keys: self.store.keys(),
            stats: self.store.stats(),
        }
    }

    /// Drop every cached entry. In-flight computations still complete and
    /// store their results.
    pub fn clear_cache(&self) {
        self.store.flush_all();
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "OK",
            timestamp: Utc::now(),
            version: crate::PKG_VERSION,
            in_flight: self.aggregators.cache().in_flight(),
            cache: self.cache_report(),
        }
    }
}
