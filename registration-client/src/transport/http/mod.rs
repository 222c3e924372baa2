//! HTTP client for the registration service API.
//!
//! Thin wrapper over reqwest: every request is built, handed to the configured
//! [`RequestInterceptor`] and only then sent.

use std::sync::Arc;

use reqwest::{
    Client, Method, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    auth::{BearerTokenInterceptor, RequestInterceptor, SigningIdentity},
    error::{ClientError, Result},
};

/// Longest error body carried into [`ClientError::ApiError`].
const MAX_ERROR_MESSAGE_CHARS: usize = 512;

const JSON: &str = "application/json";

/// Validates the API base URL.
///
/// Plain HTTP is accepted so that development services on localhost stay reachable.
fn validate_base_url(api_url: &str) -> Result<Url> {
    let url = Url::parse(api_url)
        .map_err(|e| ClientError::ConfigurationError(format!("invalid API URL '{api_url}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::ConfigurationError(format!(
            "API URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::ConfigurationError(format!("API URL '{api_url}' has no host")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::ConfigurationError(
            "API URL must not carry a query or fragment".to_owned(),
        ));
    }

    Ok(url)
}

/// Sanitizes path to prevent path traversal attacks.
///
/// Rejects paths containing directory traversal sequences.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(ClientError::ConfigurationError(
            "Invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    if !path.is_empty() && !path.starts_with('/') {
        return Err(ClientError::ConfigurationError("Path must start with '/'".to_owned()));
    }
    Ok(path)
}

fn error_message(body: &[u8]) -> String {
    String::from_utf8_lossy(body).trim().chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}

/// Successful API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SerializationError`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ClientError::SerializationError(format!("unexpected response body: {e}"))
        })
    }
}

/// Client for one registration service API.
///
/// # Examples
///
/// ```rust,no_run
/// use registration_client::{
///     auth::{SignatureAlgorithm, SigningIdentity},
///     transport::{ApiClient, HttpConfig},
/// };
///
/// # async fn example() -> registration_client::error::Result<()> {
/// let identity = SigningIdentity::from_pem_file("client-key.pem", SignatureAlgorithm::Es256)?;
/// let client = ApiClient::authenticated(
///     "https://registry.example.com/authority",
///     "did:web:participant.example.com",
///     identity,
///     &HttpConfig::default(),
/// )?;
///
/// let response = client.get("/registry/participants").await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    http_version: HttpVersion,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
}

impl ApiClient {
    /// Creates a client for the API rooted at `api_url`, without authentication.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the URL or the HTTP settings are
    /// invalid, and [`ClientError::HttpError`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use registration_client::transport::{ApiClient, HttpConfig, HttpVersion};
    ///
    /// let config = HttpConfig { timeout_secs: 60, http_version: HttpVersion::Http1, ..HttpConfig::default() };
    /// let client = ApiClient::new("http://localhost:8182/authority", &config).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8182/authority");
    /// ```
    pub fn new(api_url: &str, config: &HttpConfig) -> Result<Self> {
        validate_base_url(api_url)?;
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(ClientError::HttpError)?;

        Ok(Self {
            client,
            base_url: api_url.to_owned(),
            http_version: config.http_version,
            interceptor: None,
        })
    }

    /// Creates a client whose requests carry a bearer credential issued by `issuer`.
    ///
    /// The credential audience is `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the URL, issuer or HTTP settings are
    /// invalid.
    pub fn authenticated(
        api_url: &str,
        issuer: &str,
        identity: SigningIdentity,
        config: &HttpConfig,
    ) -> Result<Self> {
        let interceptor = BearerTokenInterceptor::new(api_url, issuer, identity)?;
        Ok(Self::new(api_url, config)?.with_interceptor(interceptor))
    }

    /// Installs the interceptor run on every outgoing request.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }

    /// Returns the installed interceptor, if any.
    #[must_use]
    pub fn request_interceptor(&self) -> Option<&dyn RequestInterceptor> {
        self.interceptor.as_deref()
    }

    /// API base URL as configured.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Protocol name for logging.
    #[must_use]
    pub const fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }

    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.execute(Method::GET, path, None).await
    }

    /// Executes a GET request and parses the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; additionally [`ClientError::SerializationError`] if the
    /// body does not parse as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.json()
    }

    /// Executes a POST request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn post(&self, path: &str, body: Option<Vec<u8>>) -> Result<ApiResponse> {
        self.execute(Method::POST, path, body).await
    }

    /// Builds, intercepts and sends one request.
    ///
    /// # Errors
    ///
    /// - [`ClientError::ConfigurationError`] if `path` is not a clean absolute path
    /// - [`ClientError::SigningError`] if the interceptor fails; the request is not sent
    /// - [`ClientError::HttpError`] on transport failure
    /// - [`ClientError::ApiError`] if the service answers with a non-success status
    #[instrument(skip(self, body), fields(base_url = %self.base_url, protocol = self.protocol_name()))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse> {
        let path = sanitize_path(path)?;
        let full_url = format!("{}{path}", self.base_url.trim_end_matches('/'));

        let mut builder = self.client.request(method, &full_url).header(ACCEPT, JSON);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, JSON).body(body);
        }
        let mut request = builder.build()?;

        if let Some(interceptor) = &self.interceptor {
            interceptor.intercept(&mut request)?;
        }

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            warn!(status = status.as_u16(), "registration service returned an error");
            return Err(api_error(status, &body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "request completed");
        Ok(ApiResponse { status: status.as_u16(), body })
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let mut message = error_message(body);
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("no response body").to_owned();
    }
    ClientError::ApiError { status: status.as_u16(), message }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::auth::{SignatureAlgorithm, test_keys::PRIVATE_KEY_P256};

    #[derive(Debug)]
    struct FailingInterceptor;

    impl RequestInterceptor for FailingInterceptor {
        fn intercept(&self, _request: &mut reqwest::Request) -> Result<()> {
            Err(ClientError::SigningError("no key available".to_owned()))
        }
    }

    fn identity() -> SigningIdentity {
        SigningIdentity::from_pem(PRIVATE_KEY_P256.as_bytes(), SignatureAlgorithm::Es256).unwrap()
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://registry.example.com/authority").is_ok());
        assert!(validate_base_url("http://localhost:8182/authority").is_ok());

        for url in [
            "not-a-url",
            "ftp://registry.example.com",
            "file:///path/to/file",
            "https://registry.example.com/api?x=1",
            "https://registry.example.com/api#top",
        ] {
            assert!(
                matches!(validate_base_url(url), Err(ClientError::ConfigurationError(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/registry/participants").unwrap(), "/registry/participants");
        assert_eq!(sanitize_path("").unwrap(), "");
        assert!(sanitize_path("/registry/../admin").is_err());
        assert!(sanitize_path("//evil.example.com").is_err());
        assert!(sanitize_path("registry").is_err());
    }

    #[test]
    fn test_error_message_truncated() {
        let body = "x".repeat(2_000);
        assert_eq!(error_message(body.as_bytes()).len(), MAX_ERROR_MESSAGE_CHARS);
        assert_eq!(error_message(b"  denied \n"), "denied");
    }

    #[test]
    fn test_api_error_falls_back_to_reason() {
        let err = api_error(StatusCode::NOT_FOUND, b"");
        assert!(matches!(err, ClientError::ApiError { status: 404, ref message } if message == "Not Found"));
    }

    #[test]
    fn test_new_with_config() {
        let config = HttpConfig { http_version: HttpVersion::Http2, ..HttpConfig::default() };
        let client = ApiClient::new("https://registry.example.com", &config).unwrap();
        assert_eq!(client.protocol_name(), "http/2");
        assert!(client.request_interceptor().is_none());

        let config = HttpConfig { http_version: HttpVersion::Http1, ..HttpConfig::default() };
        let client = ApiClient::new("https://registry.example.com", &config).unwrap();
        assert_eq!(client.protocol_name(), "http/1.1");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = HttpConfig { timeout_secs: 0, ..HttpConfig::default() };
        let result = ApiClient::new("https://registry.example.com", &config);
        assert!(matches!(result, Err(ClientError::ConfigurationError(_))));
    }

    #[test]
    fn test_authenticated_installs_interceptor() {
        let client = ApiClient::authenticated(
            "https://registry.example.com/authority",
            "did:web:participant.example.com",
            identity(),
            &HttpConfig::default(),
        )
        .unwrap();

        let interceptor = client.request_interceptor().expect("interceptor installed");
        assert!(format!("{interceptor:?}").contains("did:web:participant.example.com"));
    }

    #[test]
    fn test_authenticated_rejects_blank_issuer() {
        let result = ApiClient::authenticated(
            "https://registry.example.com/authority",
            " ",
            identity(),
            &HttpConfig::default(),
        );
        assert!(matches!(result, Err(ClientError::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn test_request_carries_bearer_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/authority/registry/participants")
            .match_header("authorization", Matcher::Regex(r"^Bearer [\w-]+\.[\w-]+\.[\w-]+$".to_owned()))
            .match_header("accept", JSON)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api_url = format!("{}/authority", server.url());
        let client = ApiClient::authenticated(
            &api_url,
            "did:web:participant.example.com",
            identity(),
            &HttpConfig::default(),
        )
        .unwrap();

        let participants: Vec<serde_json::Value> =
            client.get_json("/registry/participants").await.unwrap();
        assert!(participants.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failing_interceptor_prevents_send() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let client = ApiClient::new(&server.url(), &HttpConfig::default())
            .unwrap()
            .with_interceptor(FailingInterceptor);

        let result = client.get("/registry/participants").await;
        assert!(matches!(result, Err(ClientError::SigningError(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_mapped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/registry/participant")
            .with_status(409)
            .with_body("participant already exists")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), &HttpConfig::default()).unwrap();
        let result = client.post("/registry/participant", None).await;

        match result {
            Err(ClientError::ApiError { status, message }) => {
                assert_eq!(status, 409);
                assert_eq!(message, "participant already exists");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/registry/participant")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), &HttpConfig::default()).unwrap();
        let result: Result<serde_json::Value> = client.get_json("/registry/participant").await;
        assert!(matches!(result, Err(ClientError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_post_body_sent_as_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/registry/participant")
            .match_header("content-type", JSON)
            .match_body(Matcher::JsonString(r#"{"did":"did:web:a"}"#.to_owned()))
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), &HttpConfig::default()).unwrap();
        let response = client
            .post("/registry/participant", Some(br#"{"did":"did:web:a"}"#.to_vec()))
            .await
            .unwrap();

        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
        mock.assert_async().await;
    }
}
