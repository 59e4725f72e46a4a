//! Path and query extractors that reject with the JSON envelope.
//!
//! axum's own `Path` and `Query` answer a malformed request (bad UTF-8 in
//! a segment, a duplicated query field) with a plain-text 400. These
//! wrappers run the same extraction and turn the rejection into an
//! [`ApiError`] under [`INVALID_REQUEST`].

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::{ApiError, INVALID_REQUEST};

/// Path parameters, deserialized like [`axum::extract::Path`].
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(ApiError::bad_request(
                INVALID_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}

/// Query string, deserialized like [`axum::extract::Query`].
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError::bad_request(
                INVALID_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}
