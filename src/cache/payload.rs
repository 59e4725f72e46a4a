//! Values held by the cache store.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::types::{GithubProfile, RepoDetail, WeatherReport};

/// A fully-formed aggregation result. Cloning only bumps a reference count.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Weather(Arc<WeatherReport>),
    Profile(Arc<GithubProfile>),
    RepoDetail(Arc<RepoDetail>),
    /// Provider JSON passed through unchanged (quotes, series, news).
    Raw(Arc<Value>),
}

/// Result types that can be stored in the cache.
pub trait Cacheable: Send + Sync + Sized + 'static {
    fn into_payload(value: Arc<Self>) -> Payload;

    /// Recover the typed value, or `None` if the payload holds another type.
    fn from_payload(payload: Payload) -> Option<Arc<Self>>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_payload(value: Arc<Self>) -> Payload {
                Payload::$variant(value)
            }

            fn from_payload(payload: Payload) -> Option<Arc<Self>> {
                match payload {
                    Payload::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(WeatherReport, Weather);
cacheable!(GithubProfile, Profile);
cacheable!(RepoDetail, RepoDetail);
cacheable!(Value, Raw);
