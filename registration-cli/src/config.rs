//! Configuration file and settings resolution.
//!
//! Values are taken from the command line (or its environment variables) first, then
//! from the TOML file, then from built-in defaults.
//!
//! # Example
//!
//! ```toml
//! service_url = "https://registry.example.com/authority"
//! client_did = "did:web:participant.example.com"
//! private_key = "/etc/registration/key.pem"
//! algorithm = "ES256"
//!
//! [credential]
//! validity_secs = 600
//! cache = true
//! refresh_margin_secs = 60
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::{path::{Path, PathBuf}, time::Duration};

use registration_client::{
    ClientError,
    auth::{
        CredentialPolicy, DEFAULT_CREDENTIAL_VALIDITY_SECS, DEFAULT_REFRESH_MARGIN_SECS,
        SignatureAlgorithm,
    },
    transport::HttpConfig,
};
use serde::Deserialize;

use crate::cli::GlobalArgs;

/// API base URL used when none is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8182/authority";

/// Longest accepted credential validity.
const MAX_VALIDITY_SECS: u64 = 3_600;

type Result<T> = std::result::Result<T, ClientError>;

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Registration service API base URL.
    pub service_url: Option<String>,
    /// Identity of this participant.
    pub client_did: Option<String>,
    /// Path to the private key PEM.
    pub private_key: Option<PathBuf>,
    /// Signature algorithm.
    pub algorithm: Option<SignatureAlgorithm>,
    /// Credential lifetime settings.
    #[serde(default)]
    pub credential: CredentialConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl FileConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the TOML is invalid or has unknown keys.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ClientError::ConfigurationError(format!("invalid configuration file: {e}")))
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::ConfigurationError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }
}

/// Credential lifetime settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CredentialConfig {
    /// Seconds each credential stays valid.
    pub validity_secs: u64,
    /// Reuse one credential across requests until it nears expiry.
    pub cache: bool,
    /// Remaining validity, in seconds, at which a cached credential is replaced.
    pub refresh_margin_secs: u64,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            validity_secs: DEFAULT_CREDENTIAL_VALIDITY_SECS,
            cache: false,
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
        }
    }
}

impl CredentialConfig {
    /// Validates lifetime bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if `validity_secs` is outside 1-3600 or,
    /// with caching enabled, `refresh_margin_secs` is not shorter than the validity.
    pub fn validate(&self) -> Result<()> {
        if self.validity_secs == 0 || self.validity_secs > MAX_VALIDITY_SECS {
            return Err(ClientError::ConfigurationError(format!(
                "credential.validity_secs must be between 1 and {MAX_VALIDITY_SECS}"
            )));
        }
        if self.cache && self.refresh_margin_secs >= self.validity_secs {
            return Err(ClientError::ConfigurationError(
                "credential.refresh_margin_secs must be shorter than validity_secs".to_owned(),
            ));
        }
        Ok(())
    }

    /// Credential validity as a duration.
    #[must_use]
    pub const fn validity(&self) -> Duration {
        Duration::from_secs(self.validity_secs)
    }

    /// Policy derived from the `cache` flag.
    #[must_use]
    pub const fn policy(&self) -> CredentialPolicy {
        if self.cache {
            CredentialPolicy::Cached { refresh_margin: Duration::from_secs(self.refresh_margin_secs) }
        } else {
            CredentialPolicy::PerRequest
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Registration service API base URL.
    pub service_url: String,
    /// Identity of this participant.
    pub client_did: String,
    /// Path to the private key PEM.
    pub private_key: PathBuf,
    /// Signature algorithm.
    pub algorithm: SignatureAlgorithm,
    /// Credential lifetime settings.
    pub credential: CredentialConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
}

impl Settings {
    /// Loads the configuration file named on the command line, if any, and merges it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the file is unusable or a required
    /// value is missing.
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    /// Merges command-line values over `file` and applies defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the client DID or private key is
    /// missing, or a section fails validation.
    pub fn resolve(args: &GlobalArgs, file: FileConfig) -> Result<Self> {
        let service_url = args
            .service_url
            .clone()
            .or(file.service_url)
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_owned());

        let client_did = args.client_did.clone().or(file.client_did).ok_or_else(|| {
            ClientError::ConfigurationError(
                "client DID is required (--client-did, CLIENT_DID or client_did in the config file)"
                    .to_owned(),
            )
        })?;

        let private_key = args.private_key.clone().or(file.private_key).ok_or_else(|| {
            ClientError::ConfigurationError(
                "private key is required (--private-key, CLIENT_PRIVATE_KEY or private_key in the config file)"
                    .to_owned(),
            )
        })?;

        let algorithm = args.algorithm.or(file.algorithm).unwrap_or_default();

        file.credential.validate()?;
        file.http.validate()?;

        Ok(Self {
            service_url,
            client_did,
            private_key,
            algorithm,
            credential: file.credential,
            http: file.http,
        })
    }
}
