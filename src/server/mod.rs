//! HTTP surface and daemon configuration.
//!
//! - [`routes`]: the axum router over a shared [`Gateway`](crate::Gateway)
//! - [`error`]: the `{error, message}` envelope
//! - [`extract`]: path and query extractors that reject with that envelope
//! - [`config`]: TOML configuration and secrets for `dashgated`

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiPath, ApiQuery};
pub use routes::router;
