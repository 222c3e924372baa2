//! Bearer-token request interceptor.
//!
//! The interceptor is the hook the [`ApiClient`](crate::transport::ApiClient) runs on every
//! request right before it is sent. [`BearerTokenInterceptor`] adds exactly one header,
//! `Authorization: Bearer <credential>`, where the credential is signed by the client's
//! identity, issued by the configured issuer and addressed to the API base URL.

use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use reqwest::{
    Request,
    header::{AUTHORIZATION, HeaderValue},
};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    auth::{
        BEARER_SCHEME, DEFAULT_CREDENTIAL_VALIDITY_SECS,
        credential::{Credential, unix_now},
        keys::{SignatureAlgorithm, SigningIdentity},
    },
    error::{ClientError, Result},
};

/// Mutates an outgoing request before it is sent.
///
/// Implementations must be reusable and safe to call from concurrent requests.
pub trait RequestInterceptor: fmt::Debug + Send + Sync {
    /// Adds headers to `request`.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the request; it is never sent.
    fn intercept(&self, request: &mut Request) -> Result<()>;
}

impl<T: RequestInterceptor + ?Sized> RequestInterceptor for Arc<T> {
    fn intercept(&self, request: &mut Request) -> Result<()> {
        (**self).intercept(request)
    }
}

/// When a new credential is signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Sign a fresh credential for every request.
    #[default]
    PerRequest,
    /// Reuse the last credential until less than `refresh_margin` of its validity remains.
    Cached {
        /// Remaining validity at which the credential is replaced.
        refresh_margin: Duration,
    },
}

/// Attaches `Authorization: Bearer <credential>` to every request.
///
/// # Examples
///
/// ```no_run
/// use registration_client::auth::{BearerTokenInterceptor, RequestInterceptor, SignatureAlgorithm, SigningIdentity};
///
/// # fn example() -> registration_client::error::Result<()> {
/// let identity = SigningIdentity::from_pem_file("client-key.pem", SignatureAlgorithm::Es256)?;
/// let interceptor = BearerTokenInterceptor::new(
///     "https://registry.example.com/authority",
///     "did:web:participant.example.com",
///     identity,
/// )?;
///
/// let url = "https://registry.example.com/authority/registry/participants".parse().unwrap();
/// let mut request = reqwest::Request::new(reqwest::Method::GET, url);
/// interceptor.intercept(&mut request)?;
/// assert!(request.headers().contains_key("authorization"));
/// # Ok(())
/// # }
/// ```
pub struct BearerTokenInterceptor {
    audience: Arc<str>,
    issuer: Arc<str>,
    identity: SigningIdentity,
    validity: Duration,
    policy: CredentialPolicy,
    cached: Mutex<Option<Credential>>,
}

impl BearerTokenInterceptor {
    /// Creates an interceptor issuing credentials as `issuer` for the API at `api_url`.
    ///
    /// `api_url` is used verbatim as the credential audience.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if `api_url` is not an absolute URL with
    /// a host or `issuer` is blank.
    pub fn new(api_url: &str, issuer: &str, identity: SigningIdentity) -> Result<Self> {
        let url = Url::parse(api_url).map_err(|e| {
            ClientError::ConfigurationError(format!("invalid API URL '{api_url}': {e}"))
        })?;
        if !url.has_host() {
            return Err(ClientError::ConfigurationError(format!(
                "API URL '{api_url}' has no host"
            )));
        }
        if issuer.trim().is_empty() {
            return Err(ClientError::ConfigurationError("issuer must not be empty".to_owned()));
        }

        Ok(Self {
            audience: Arc::from(api_url),
            issuer: Arc::from(issuer),
            identity,
            validity: Duration::from_secs(DEFAULT_CREDENTIAL_VALIDITY_SECS),
            policy: CredentialPolicy::PerRequest,
            cached: Mutex::new(None),
        })
    }

    /// Sets how long each credential stays valid.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if `validity` is shorter than one second
    /// or not longer than the refresh margin of a cached policy.
    pub fn with_validity(mut self, validity: Duration) -> Result<Self> {
        check_lifetimes(validity, self.policy)?;
        self.validity = validity;
        Ok(self)
    }

    /// Sets the credential policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if a cached policy's refresh margin is
    /// not shorter than the credential validity.
    pub fn with_policy(mut self, policy: CredentialPolicy) -> Result<Self> {
        check_lifetimes(self.validity, policy)?;
        self.policy = policy;
        Ok(self)
    }

    /// Audience claim of issued credentials.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Issuer claim of issued credentials.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Active credential policy.
    #[must_use]
    pub const fn policy(&self) -> CredentialPolicy {
        self.policy
    }

    /// Builds the `Authorization` header value for the next request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SigningError`] if no credential can be produced.
    pub fn authorization_header(&self) -> Result<HeaderValue> {
        let credential = self.credential()?;
        let mut value = HeaderValue::from_str(&format!("{BEARER_SCHEME} {}", credential.token))
            .map_err(|e| ClientError::SigningError(format!("credential is not a valid header: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn credential(&self) -> Result<Credential> {
        match self.policy {
            CredentialPolicy::PerRequest => self.issue(),
            CredentialPolicy::Cached { refresh_margin } => {
                let mut slot = self.cached.lock().map_err(|_| {
                    ClientError::SigningError("credential cache lock poisoned".to_owned())
                })?;

                let now = unix_now()?;
                if let Some(credential) = slot.as_ref()
                    && !credential.claims.expires_within(now, refresh_margin)
                {
                    return Ok(credential.clone());
                }

                let credential = self.issue()?;
                *slot = Some(credential.clone());
                Ok(credential)
            }
        }
    }

    fn issue(&self) -> Result<Credential> {
        let credential =
            Credential::issue(&self.identity, &self.issuer, &self.audience, self.validity)?;
        debug!(jti = %credential.claims.jti, exp = credential.claims.exp, "issued credential");
        Ok(credential)
    }
}

impl RequestInterceptor for BearerTokenInterceptor {
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    fn intercept(&self, request: &mut Request) -> Result<()> {
        let value = self.authorization_header()?;
        // insert replaces any existing entry, leaving exactly one
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl fmt::Debug for BearerTokenInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenInterceptor")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("algorithm", &self.identity.algorithm())
            .field("validity", &self.validity)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn check_lifetimes(validity: Duration, policy: CredentialPolicy) -> Result<()> {
    if validity.as_secs() == 0 {
        return Err(ClientError::ConfigurationError(
            "credential validity must be at least one second".to_owned(),
        ));
    }
    if let CredentialPolicy::Cached { refresh_margin } = policy
        && refresh_margin >= validity
    {
        return Err(ClientError::ConfigurationError(
            "refresh margin must be shorter than credential validity".to_owned(),
        ));
    }
    Ok(())
}

/// Creates the interceptor for an API client.
///
/// `signing_key` is a PKCS#8 PEM private key for ES256 (P-256). Credentials are signed
/// fresh for every request.
///
/// # Errors
///
/// Returns [`ClientError::ConfigurationError`] if the URL, issuer or key is unusable.
pub fn create_interceptor(
    api_url: &str,
    issuer: &str,
    signing_key: &str,
) -> Result<BearerTokenInterceptor> {
    let identity = SigningIdentity::from_pem(signing_key.as_bytes(), SignatureAlgorithm::Es256)?;
    BearerTokenInterceptor::new(api_url, issuer, identity)
}
