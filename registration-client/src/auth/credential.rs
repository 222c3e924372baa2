//! Signed credentials presented as bearer tokens.
//!
//! A credential is a compact JWS ([RFC 7519](https://www.rfc-editor.org/rfc/rfc7519.html))
//! signed by the client's [`SigningIdentity`]. The registration service identifies the
//! caller by the issuer claim and checks that the audience is its own API URL.
//!
//! # Claims
//!
//! - `iss`: Caller identity (typically a DID such as `did:web:participant.example.com`)
//! - `sub`: Same as `iss`; the caller asserts its own identity
//! - `aud`: API base URL of the registration service, verbatim
//! - `iat`: Issued-at timestamp (Unix time)
//! - `exp`: Expiration timestamp (Unix time)
//! - `jti`: Random UUID, unique per credential
//!
//! # Lifetime
//!
//! Credentials expire [`DEFAULT_CREDENTIAL_VALIDITY_SECS`](super::DEFAULT_CREDENTIAL_VALIDITY_SECS)
//! seconds after creation unless another validity is requested.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use registration_client::auth::{
//!     Credential, CredentialClaims, SignatureAlgorithm, SigningIdentity,
//! };
//!
//! # fn example() -> registration_client::error::Result<()> {
//! let identity = SigningIdentity::from_pem_file("client-key.pem", SignatureAlgorithm::Es256)?;
//!
//! let claims = CredentialClaims::new(
//!     "did:web:participant.example.com",
//!     "https://registry.example.com/authority",
//!     Duration::from_secs(600),
//! )?;
//!
//! let credential = Credential::create(&claims, &identity)?;
//! println!("Authorization: Bearer {}", credential.token);
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, SystemTime};

use jsonwebtoken::Header;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::keys::SigningIdentity,
    error::{ClientError, Result},
};

/// JWT claims carried by a credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialClaims {
    /// Issuer - identity of the calling client.
    pub iss: String,

    /// Subject - the client itself.
    pub sub: String,

    /// Audience - API base URL of the registration service.
    ///
    /// The service rejects credentials minted for another audience.
    pub aud: String,

    /// Issued at (Unix timestamp).
    pub iat: u64,

    /// Expiration time (Unix timestamp).
    pub exp: u64,

    /// Unique credential identifier.
    pub jti: String,
}

impl CredentialClaims {
    /// Creates claims for `issuer` addressed to `audience`, valid for `validity`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SigningError`] if the system clock is before the Unix epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use registration_client::auth::CredentialClaims;
    ///
    /// # fn example() -> registration_client::error::Result<()> {
    /// let claims = CredentialClaims::new(
    ///     "did:web:participant.example.com",
    ///     "https://registry.example.com",
    ///     Duration::from_secs(600),
    /// )?;
    ///
    /// assert_eq!(claims.iss, "did:web:participant.example.com");
    /// assert_eq!(claims.sub, claims.iss);
    /// assert_eq!(claims.aud, "https://registry.example.com");
    /// assert_eq!(claims.exp - claims.iat, 600);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(issuer: &str, audience: &str, validity: Duration) -> Result<Self> {
        let now = unix_now()?;

        Ok(Self {
            iss: issuer.to_owned(),
            sub: issuer.to_owned(),
            aud: audience.to_owned(),
            iat: now,
            exp: now.saturating_add(validity.as_secs()),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Returns `true` if fewer than `margin` remain before expiry at time `now`.
    #[must_use]
    pub const fn expires_within(&self, now: u64, margin: Duration) -> bool {
        self.exp.saturating_sub(now) <= margin.as_secs()
    }
}

/// Signed credential (JWT).
///
/// # Format
///
/// `header.payload.signature`, each part base64url without padding:
///
/// - Header: `{"typ":"JWT","alg":"ES256"}` (or `EdDSA`)
/// - Payload: JSON-encoded [`CredentialClaims`]
/// - Signature: over `header.payload` with the client's private key
#[derive(Debug, Clone)]
pub struct Credential {
    /// Compact serialization, ready for the `Authorization` header.
    pub token: String,

    /// Claims contained in the token.
    pub claims: CredentialClaims,
}

impl Credential {
    /// Signs `claims` with `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SigningError`] if encoding or signing fails.
    #[instrument(skip_all, fields(iss = %claims.iss, aud = %claims.aud, alg = %identity.algorithm()))]
    pub fn create(claims: &CredentialClaims, identity: &SigningIdentity) -> Result<Self> {
        let header = Header::new(identity.algorithm().jwt_algorithm());

        let token = jsonwebtoken::encode(&header, claims, identity.encoding_key())
            .map_err(|e| ClientError::SigningError(format!("credential encoding failed: {e}")))?;

        Ok(Self { token, claims: claims.clone() })
    }

    /// Creates claims and signs them in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SigningError`] if the clock is unusable or signing fails.
    pub fn issue(
        identity: &SigningIdentity,
        issuer: &str,
        audience: &str,
        validity: Duration,
    ) -> Result<Self> {
        let claims = CredentialClaims::new(issuer, audience, validity)?;
        Self::create(&claims, identity)
    }
}

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| ClientError::SigningError(format!("system time error: {e}")))
}
