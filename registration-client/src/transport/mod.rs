//! HTTP transport to the registration service.
//!
//! The transport layer separates protocol mechanics from the registry calls:
//! - **[`ApiClient`]**: Builds requests against the API base URL, runs the request
//!   interceptor and maps non-success statuses to [`ClientError::ApiError`](crate::error::ClientError::ApiError)
//! - **[`HttpConfig`]**: Timeouts, pooling and HTTP version, loadable from TOML
//! - **[`RegistryClient`](crate::registry::RegistryClient)**: Typed calls on top of the API client

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::{ApiClient, ApiResponse};
