//! Credential verification.
//!
//! Counterpart of [`Credential::create`](super::Credential::create): checks that a bearer
//! credential was signed by a known public key and addressed to the expected audience.

use jsonwebtoken::{Validation, errors::ErrorKind};
use tracing::{debug, instrument, warn};

use crate::{
    auth::{BEARER_SCHEME, credential::CredentialClaims, keys::VerificationKey},
    error::{ClientError, Result},
};

/// Verifies credentials signed by a single client key.
///
/// Checks performed:
/// - signature against the configured public key, algorithm pinned to the key's algorithm
/// - `aud` equals the expected audience
/// - `exp` is in the future (with clock-skew leeway)
/// - `iss`, `sub`, `aud` and `exp` are present
/// - `iss` equals the expected issuer, when one is configured
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    key: VerificationKey,
    issuer: Option<String>,
    leeway_secs: u64,
}

impl CredentialVerifier {
    /// Default tolerated clock skew in seconds.
    pub const DEFAULT_LEEWAY_SECS: u64 = 60;

    /// Creates a verifier for credentials signed by the private half of `key`.
    #[must_use]
    pub const fn new(key: VerificationKey) -> Self {
        Self { key, issuer: None, leeway_secs: Self::DEFAULT_LEEWAY_SECS }
    }

    /// Additionally requires the `iss` claim to equal `issuer`.
    #[must_use]
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_owned());
        self
    }

    /// Overrides the tolerated clock skew.
    #[must_use]
    pub const fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Verifies a compact credential and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::VerificationError`] if the token is malformed, the signature
    /// does not verify, or any claim check fails.
    #[instrument(skip(self, token), fields(alg = %self.key.algorithm()))]
    pub fn verify(&self, token: &str, audience: &str) -> Result<CredentialClaims> {
        let mut validation = Validation::new(self.key.algorithm().jwt_algorithm());
        validation.leeway = self.leeway_secs;
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        match jsonwebtoken::decode::<CredentialClaims>(token, self.key.decoding_key(), &validation)
        {
            Ok(data) => {
                debug!(iss = %data.claims.iss, "credential verified");
                Ok(data.claims)
            }
            Err(err) => {
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "credential expired",
                    ErrorKind::InvalidSignature => "invalid signature",
                    ErrorKind::InvalidAudience => "audience mismatch",
                    ErrorKind::InvalidIssuer => "issuer mismatch",
                    ErrorKind::InvalidAlgorithm => "unexpected algorithm",
                    ErrorKind::MissingRequiredClaim(_) => "missing required claim",
                    ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                        "malformed credential"
                    }
                    _ => "credential rejected",
                };
                warn!(error = %err, reason, "credential verification failed");
                Err(ClientError::VerificationError(format!("{reason}: {err}")))
            }
        }
    }

    /// Verifies the value of an `Authorization` header.
    ///
    /// The value must be exactly `Bearer <token>`: the scheme, one space and the token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::VerificationError`] if the header is not a bearer credential
    /// or the credential does not verify.
    pub fn verify_authorization_header(
        &self,
        header_value: &str,
        audience: &str,
    ) -> Result<CredentialClaims> {
        let token = parse_bearer(header_value).ok_or_else(|| {
            ClientError::VerificationError("authorization header is not a bearer credential".to_owned())
        })?;
        self.verify(token, audience)
    }
}

/// Splits `Bearer <token>` into the token.
///
/// Returns `None` unless the value is the scheme, a single space and a non-empty token
/// without further spaces.
#[must_use]
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    (scheme == BEARER_SCHEME && !token.is_empty() && !token.contains(' ')).then_some(token)
}
