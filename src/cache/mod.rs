//! Caching subsystem.
//!
//! - [`CacheStore`]: process-wide key/value store with per-entry TTL and
//!   hit/miss counters.
//! - [`CacheThrough`]: compute-if-absent executor over the store that runs
//!   at most one computation per key at a time.
//! - [`AggregationRequest`] / [`CacheKey`]: canonical key derivation from an
//!   endpoint id and its parameters.

mod key;
mod payload;
mod store;
mod through;

pub use key::{AggregationRequest, CacheKey};
pub use payload::{Cacheable, Payload};
pub use store::{CacheConfig, CacheEntry, CacheStats, CacheStore};
pub use through::CacheThrough;
