//! Registration CLI - command-line client for the dataspace registration service
//!
//! ```text
//! registration-cli -d did:web:participant.example.com -k key.pem participants list
//! ```
//!
//! Results are printed to stdout as JSON, logs go to stderr.
//!
//! # Exit Codes
//!
//! - `0`: Success
//! - `1`: Request, signing or output failure
//! - `2`: Invalid arguments or configuration

mod cli;
mod commands;
mod config;
mod observability;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use registration_client::ClientError;
use tracing::info;

use crate::{cli::Cli, config::Settings, observability::init_observability};

/// Exit status for configuration errors, matching clap's usage errors.
const EXIT_CONFIGURATION: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability(cli.global.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_args(&cli.global).context("failed to load configuration")?;
    info!(
        service_url = %settings.service_url,
        client_did = %settings.client_did,
        algorithm = %settings.algorithm,
        "starting registration-cli"
    );

    let registry = commands::build_registry(&settings).context("failed to create API client")?;

    let mut stdout = std::io::stdout().lock();
    commands::execute(cli.command, &registry, &mut stdout).await?;
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ClientError>() {
        Some(client_error) if client_error.is_configuration() => EXIT_CONFIGURATION,
        _ => 1,
    }
}
