//! Participant registry operations.
//!
//! The caller is identified by the credential its [`ApiClient`] attaches, so none of the
//! calls take an identity argument.

pub mod models;

use tracing::{info, instrument};

pub use models::{ParticipantDto, ParticipantStatus};

use crate::{error::Result, transport::ApiClient};

const PARTICIPANTS_PATH: &str = "/registry/participants";
const PARTICIPANT_PATH: &str = "/registry/participant";

/// Typed client for the registry endpoints.
///
/// # Examples
///
/// ```no_run
/// use registration_client::{
///     auth::{SignatureAlgorithm, SigningIdentity},
///     registry::RegistryClient,
///     transport::{ApiClient, HttpConfig},
/// };
///
/// # async fn example() -> registration_client::error::Result<()> {
/// let identity = SigningIdentity::from_pem_file("client-key.pem", SignatureAlgorithm::Es256)?;
/// let api = ApiClient::authenticated(
///     "https://registry.example.com/authority",
///     "did:web:participant.example.com",
///     identity,
///     &HttpConfig::default(),
/// )?;
///
/// let registry = RegistryClient::new(api);
/// for participant in registry.list_participants().await? {
///     println!("{} {}", participant.did, participant.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RegistryClient {
    api: ApiClient,
}

impl RegistryClient {
    /// Wraps an API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Underlying API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Lists all participants of the dataspace.
    ///
    /// # Errors
    ///
    /// Returns error if signing, the HTTP request, or response parsing fails.
    #[instrument(skip(self), fields(base_url = %self.api.base_url()))]
    pub async fn list_participants(&self) -> Result<Vec<ParticipantDto>> {
        let participants: Vec<ParticipantDto> = self.api.get_json(PARTICIPANTS_PATH).await?;
        info!(count = participants.len(), "listed participants");
        Ok(participants)
    }

    /// Fetches the registry entry of the calling participant.
    ///
    /// # Errors
    ///
    /// Returns error if signing, the HTTP request, or response parsing fails.
    #[instrument(skip(self), fields(base_url = %self.api.base_url()))]
    pub async fn get_participant(&self) -> Result<ParticipantDto> {
        self.api.get_json(PARTICIPANT_PATH).await
    }

    /// Asks the registry to onboard the calling participant.
    ///
    /// # Errors
    ///
    /// Returns error if signing or the HTTP request fails, or the service refuses.
    #[instrument(skip(self), fields(base_url = %self.api.base_url()))]
    pub async fn add_participant(&self) -> Result<()> {
        self.api.post(PARTICIPANT_PATH, None).await?;
        info!("participant registration submitted");
        Ok(())
    }
}
