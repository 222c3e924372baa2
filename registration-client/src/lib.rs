//! Registration Client: Authenticated Access to a Dataspace Registration Service
//!
//! A Rust library for command-line clients of a participant registration service.
//! Every API request carries a self-issued, signed credential that identifies the
//! calling participant, and command results are rendered as JSON.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  registration   │  CLI: arguments, config file, logging
//! │      -cli       │
//! └────────┬────────┘
//!          │ RegistryClient (list / get / add participant)
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │         registration-client (this crate)        │
//! │  ┌──────────────┐      ┌──────────────────┐     │
//! │  │  ApiClient   │──────│ BearerToken      │     │
//! │  │  (reqwest)   │      │ Interceptor      │     │
//! │  └──────────────┘      │ (ES256 / EdDSA)  │     │
//! │                        └──────────────────┘     │
//! └────────┬────────────────────────────────────────┘
//!          │ HTTP + Authorization: Bearer <credential>
//!          │
//! ┌────────▼────────┐
//! │  Registration   │  verifies signature, iss and aud
//! │    Service      │
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. List Participants
//!
//! ```rust,no_run
//! use registration_client::{
//!     auth::{SignatureAlgorithm, SigningIdentity},
//!     output::write_to_output,
//!     registry::RegistryClient,
//!     transport::{ApiClient, HttpConfig},
//! };
//!
//! # async fn example() -> registration_client::error::Result<()> {
//! let identity = SigningIdentity::from_pem_file("client-key.pem", SignatureAlgorithm::Es256)?;
//! let api = ApiClient::authenticated(
//!     "https://registry.example.com/authority",
//!     "did:web:participant.example.com",
//!     identity,
//!     &HttpConfig::default(),
//! )?;
//!
//! let participants = RegistryClient::new(api).list_participants().await?;
//! write_to_output(&mut std::io::stdout().lock(), &participants)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Authenticate Arbitrary Requests
//!
//! ```rust,no_run
//! use registration_client::auth::{RequestInterceptor, create_interceptor};
//!
//! # fn example(pem: &str) -> registration_client::error::Result<()> {
//! let interceptor = create_interceptor(
//!     "https://registry.example.com/authority",
//!     "did:web:participant.example.com",
//!     pem,
//! )?;
//!
//! let url = "https://registry.example.com/authority/registry/participant".parse().unwrap();
//! let mut request = reqwest::Request::new(reqwest::Method::POST, url);
//! interceptor.intercept(&mut request)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`]: Signing identities, credentials, the bearer-token interceptor and verification
//! - [`transport`]: HTTP client and its configuration
//! - [`registry`]: Participant registry calls and data models
//! - [`output`]: JSON rendering of command results
//! - [`error`]: Error types
//!
//! # Security Considerations
//!
//! - **Key material**: Private keys are read once, parsed, and the file contents wiped.
//!   Keys never appear in `Debug` output or logs.
//! - **Audience binding**: The credential audience is the exact API base URL, so a
//!   credential cannot be replayed against another service.
//! - **Short lifetime**: Credentials expire after 10 minutes by default and carry a
//!   unique `jti`.
//! - **Sensitive headers**: The `Authorization` value is marked sensitive and is not logged.
//!
//! # Error Handling
//!
//! All operations return [`Result<T, ClientError>`](error::Result):
//!
//! ```rust,no_run
//! use registration_client::{ClientError, registry::RegistryClient};
//!
//! # async fn example(registry: RegistryClient) {
//! match registry.add_participant().await {
//!     Ok(()) => println!("registration submitted"),
//!     Err(ClientError::ApiError { status: 409, .. }) => println!("already registered"),
//!     Err(ClientError::SigningError(msg)) => eprintln!("could not sign request: {msg}"),
//!     Err(e) => eprintln!("registration failed: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and jsonwebtoken"
)]

pub mod auth;
pub mod error;
pub mod output;
pub mod registry;
pub mod transport;

pub use auth::{BearerTokenInterceptor, RequestInterceptor, create_interceptor};
pub use error::{ClientError, Result};
pub use output::write_to_output;
pub use registry::RegistryClient;
pub use transport::ApiClient;
