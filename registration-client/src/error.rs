//! Error types for the registration client.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Setup Errors** ([`ClientError::ConfigurationError`]): invalid API URL, empty issuer,
//!   malformed key material or out-of-range HTTP settings
//! - **Credential Errors** ([`ClientError::SigningError`], [`ClientError::VerificationError`]):
//!   credential creation or verification failures
//! - **Output Errors** ([`ClientError::SerializationError`], [`ClientError::Io`]): rendering or
//!   writing JSON
//! - **Network Errors** ([`ClientError::HttpError`], [`ClientError::ApiError`]): transport
//!   failures and non-success responses from the registration service
//!
//! # Examples
//!
//! ```
//! use registration_client::error::{ClientError, Result};
//!
//! fn require_issuer(issuer: &str) -> Result<&str> {
//!     if issuer.trim().is_empty() {
//!         return Err(ClientError::ConfigurationError("issuer must not be empty".to_owned()));
//!     }
//!     Ok(issuer)
//! }
//!
//! assert!(require_issuer("did:web:example.com").is_ok());
//! assert!(require_issuer("  ").is_err());
//! ```

use thiserror::Error;

/// Result type alias for registration client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur in the registration client.
///
/// None of these errors are retried internally. They surface to the caller
/// (ultimately the command line) as user-visible failures.
///
/// # Error Recovery
///
/// - **Configuration errors** ([`ConfigurationError`](Self::ConfigurationError)): fix the
///   input (URL, issuer, key file) and run again
/// - **Signing errors** ([`SigningError`](Self::SigningError)): check the system clock and
///   that the key matches the configured algorithm
/// - **Transient errors** ([`HttpError`](Self::HttpError)): retry the command
/// - **API errors** ([`ApiError`](Self::ApiError)): inspect the status; `401`/`403` usually
///   mean the service does not trust the issuer identity
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client construction failed.
    ///
    /// Raised at setup time, never per request. Common causes:
    /// - API URL is not an absolute `http`/`https` URL
    /// - Issuer identity is empty
    /// - Private key is missing, not PEM, not PKCS#8, or of the wrong key type / curve for
    ///   the configured algorithm
    /// - HTTP timeouts outside their accepted range
    ///
    /// # Examples
    ///
    /// ```
    /// use registration_client::error::ClientError;
    ///
    /// let err = ClientError::ConfigurationError("issuer must not be empty".to_owned());
    /// assert_eq!(err.to_string(), "Invalid configuration: issuer must not be empty");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// Credential creation failed while preparing a request.
    ///
    /// The request that triggered the failure is never sent.
    #[error("Credential signing failed: {0}")]
    SigningError(String),

    /// A signed credential could not be verified.
    ///
    /// Covers bad signatures, audience or issuer mismatch, expiry and malformed tokens.
    #[error("Credential verification failed: {0}")]
    VerificationError(String),

    /// A value could not be rendered as, or parsed from, JSON.
    ///
    /// When raised by [`write_to_output`](crate::output::write_to_output) nothing has been
    /// written to the sink.
    #[error("JSON serialization failed: {0}")]
    SerializationError(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS or TLS failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The registration service answered with a non-success status.
    #[error("Registration service returned status {status}: {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated) or status reason.
        message: String,
    },

    /// Reading key material or writing command output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Returns `true` for errors raised while building the client rather than while using it.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }
}
