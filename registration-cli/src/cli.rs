//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use registration_client::auth::SignatureAlgorithm;

use crate::observability::LogFormat;

/// Client for the dataspace participant registration service.
#[derive(Debug, Parser)]
#[command(name = "registration-cli", version, about)]
pub struct Cli {
    /// Options shared by all commands.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Connection, identity and logging options.
///
/// Every value may also come from the environment or the configuration file; the
/// command line wins over both.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Registration service API base URL.
    #[arg(short = 's', long, env = "REGISTRATION_SERVICE_URL", global = true)]
    pub service_url: Option<String>,

    /// Identity of this participant, used as credential issuer.
    #[arg(short = 'd', long, env = "CLIENT_DID", global = true)]
    pub client_did: Option<String>,

    /// PEM file holding the PKCS#8 private key.
    #[arg(short = 'k', long, env = "CLIENT_PRIVATE_KEY", global = true)]
    pub private_key: Option<PathBuf>,

    /// Credential signature algorithm (ES256 or EdDSA).
    #[arg(long, env = "CLIENT_KEY_ALGORITHM", global = true)]
    pub algorithm: Option<SignatureAlgorithm>,

    /// TOML configuration file.
    #[arg(short = 'c', long, env = "REGISTRATION_CLI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t, global = true)]
    pub log_format: LogFormat,
}

/// Top-level commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Participant registry operations.
    #[command(subcommand)]
    Participants(ParticipantsCommand),
}

/// Participant registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ParticipantsCommand {
    /// List all dataspace participants.
    List,
    /// Show the registry entry of this participant.
    Get,
    /// Register this participant with the dataspace.
    Add,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_options() {
        let cli = Cli::try_parse_from([
            "registration-cli",
            "-s",
            "https://registry.example.com/authority",
            "-d",
            "did:web:participant.example.com",
            "-k",
            "/etc/registration/key.pem",
            "participants",
            "list",
        ])
        .unwrap();

        assert_eq!(cli.global.service_url.as_deref(), Some("https://registry.example.com/authority"));
        assert_eq!(cli.global.client_did.as_deref(), Some("did:web:participant.example.com"));
        assert_eq!(cli.global.private_key, Some(PathBuf::from("/etc/registration/key.pem")));
        assert_eq!(cli.command, Command::Participants(ParticipantsCommand::List));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "registration-cli",
            "participants",
            "add",
            "--client-did",
            "did:web:late.example.com",
            "--algorithm",
            "EdDSA",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Participants(ParticipantsCommand::Add));
        assert_eq!(cli.global.client_did.as_deref(), Some("did:web:late.example.com"));
        assert_eq!(cli.global.algorithm, Some(SignatureAlgorithm::EdDsa));
        assert_eq!(cli.global.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = Cli::try_parse_from([
            "registration-cli",
            "--algorithm",
            "RS256",
            "participants",
            "get",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["registration-cli"]).is_err());
        assert!(Cli::try_parse_from(["registration-cli", "participants"]).is_err());
        assert!(Cli::try_parse_from(["registration-cli", "participants", "remove"]).is_err());
    }
}
