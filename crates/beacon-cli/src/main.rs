//! beacon: command-line client for the presence service.
//!
//! Reads `config.toml`, authenticates with `BEACON_ACCESS_TOKEN`, and runs
//! one presence operation, or watches presence until interrupted.

mod cli;
mod commands;
mod setup;

use std::process::ExitCode;

use beacon_common::{BeaconError, HostLifecycle};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Config is read before logging starts so its level can apply; load
    // errors are reported once the subscriber is up.
    let config = setup::load_config(args.config.as_deref());

    let directive = setup::log_directive(
        args.log_level.as_deref(),
        config.as_ref().ok().map(|c| &c.logging),
    );
    let filter = EnvFilter::builder()
        .parse(&directive)
        .unwrap_or_else(|_| EnvFilter::new("beacon=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("beacon v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match config {
        Ok(config) => run(args, config).await,
        Err(e) => Err(BeaconError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("beacon: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Args, config: beacon_config::BeaconConfig) -> Result<(), BeaconError> {
    if let Some(ref path) = args.config {
        tracing::info!("using config override: {}", path.display());
    }

    let host = HostLifecycle::new();
    let client = setup::build_client(&config, args.user_id.as_deref(), host.clone())?;
    commands::run(args.command, &client, &host).await
}
