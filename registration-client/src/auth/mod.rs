//! Request authentication for the registration service.
//!
//! Every request to the registration service carries a self-issued credential:
//!
//! ```text
//! Authorization: Bearer <header>.<claims>.<signature>
//! ```
//!
//! The credential is a JWT signed with the client's private key. Its issuer is the
//! client's identity and its audience is the base URL of the API being called, so a
//! credential minted for one service cannot be replayed against another.
//!
//! # Components
//!
//! - [`SigningIdentity`]: Private key plus algorithm (ES256 by default, EdDSA optional)
//! - [`Credential`]: Signed token and the claims inside it
//! - [`BearerTokenInterceptor`]: Attaches a credential to each outgoing request
//! - [`CredentialVerifier`]: Checks a credential against a public key, as the service does
//!
//! # Examples
//!
//! ```no_run
//! use registration_client::auth::{RequestInterceptor, create_interceptor};
//!
//! # fn example(pem: &str) -> registration_client::error::Result<()> {
//! let interceptor = create_interceptor(
//!     "https://registry.example.com/authority",
//!     "did:web:participant.example.com",
//!     pem,
//! )?;
//!
//! let url = "https://registry.example.com/authority/registry/participants".parse().unwrap();
//! let mut request = reqwest::Request::new(reqwest::Method::GET, url);
//! interceptor.intercept(&mut request)?;
//! # Ok(())
//! # }
//! ```

pub mod credential;
pub mod interceptor;
pub mod keys;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_keys;

pub use credential::{Credential, CredentialClaims};
pub use interceptor::{BearerTokenInterceptor, CredentialPolicy, RequestInterceptor, create_interceptor};
pub use keys::{SignatureAlgorithm, SigningIdentity, VerificationKey};
pub use verifier::{CredentialVerifier, parse_bearer};

/// Authorization scheme used for credentials.
pub const BEARER_SCHEME: &str = "Bearer";

/// Lifetime of a credential, in seconds, unless configured otherwise.
pub const DEFAULT_CREDENTIAL_VALIDITY_SECS: u64 = 600;

/// Refresh margin, in seconds, for the cached credential policy.
pub const DEFAULT_REFRESH_MARGIN_SECS: u64 = 60;
