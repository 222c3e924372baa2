//! Command execution.

use std::io::Write;

use registration_client::{
    ApiClient, ClientError, RegistryClient,
    auth::{BearerTokenInterceptor, SigningIdentity},
    output::write_to_output,
};
use tracing::{debug, info};

use crate::{
    cli::{Command, ParticipantsCommand},
    config::Settings,
};

/// Builds the authenticated registry client described by `settings`.
///
/// # Errors
///
/// Returns [`ClientError::ConfigurationError`] if the key, identity, URL or HTTP settings
/// are unusable.
pub fn build_registry(settings: &Settings) -> Result<RegistryClient, ClientError> {
    let identity = SigningIdentity::from_pem_file(&settings.private_key, settings.algorithm)?;

    let interceptor =
        BearerTokenInterceptor::new(&settings.service_url, &settings.client_did, identity)?
            .with_validity(settings.credential.validity())?
            .with_policy(settings.credential.policy())?;
    debug!(?interceptor, "request authentication configured");

    let api = ApiClient::new(&settings.service_url, &settings.http)?.with_interceptor(interceptor);
    Ok(RegistryClient::new(api))
}

/// Runs `command`, writing its JSON result to `out`.
///
/// # Errors
///
/// Propagates every registry, signing and output error unchanged.
pub async fn execute<W: Write>(
    command: Command,
    registry: &RegistryClient,
    out: &mut W,
) -> Result<(), ClientError> {
    match command {
        Command::Participants(ParticipantsCommand::List) => {
            let participants = registry.list_participants().await?;
            write_to_output(out, &participants)
        }
        Command::Participants(ParticipantsCommand::Get) => {
            let participant = registry.get_participant().await?;
            write_to_output(out, &participant)
        }
        Command::Participants(ParticipantsCommand::Add) => {
            registry.add_participant().await?;
            info!(base_url = registry.api().base_url(), "registration request accepted");
            Ok(())
        }
    }
}
