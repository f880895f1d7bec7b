//! Builds the presence client from config and the environment.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use beacon_common::{BeaconError, ConfigError, HostLifecycle};
use beacon_config::{BeaconConfig, LoggingConfig};
use beacon_presence::{
    HttpGateway, HttpGatewayConfig, Identity, PresenceClient, PresenceError, PresenceOptions,
};

/// Environment variable holding the bearer token for the presence service.
pub const ACCESS_TOKEN_VAR: &str = "BEACON_ACCESS_TOKEN";

const DEFAULT_DIRECTIVE: &str = "beacon=info";

/// Tracing filter directive: the CLI override wins, then the config level.
pub fn log_directive(cli_level: Option<&str>, logging: Option<&LoggingConfig>) -> String {
    match (cli_level, logging) {
        (Some(level), _) if level.contains('=') => level.to_string(),
        (Some(level), _) => format!("beacon={level}"),
        (None, Some(logging)) => format!("beacon={}", logging.level.as_directive()),
        (None, None) => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Load config from `path`, or from the platform default location.
pub fn load_config(path: Option<&Path>) -> Result<BeaconConfig, ConfigError> {
    match path {
        Some(path) => beacon_config::load_config_from(path),
        None => beacon_config::load_config(),
    }
}

pub fn presence_options(config: &BeaconConfig) -> PresenceOptions {
    PresenceOptions {
        initialize_worker: config.presence.initialize_worker,
        subscription_ttl: secs(config.presence.subscription_ttl),
        groundskeeper_interval: secs(config.worker.groundskeeper_interval),
        renew_margin: secs(config.worker.renew_margin),
        event_capacity: config.worker.event_capacity as usize,
    }
}

pub fn gateway_config(config: &BeaconConfig, access_token: Option<String>) -> HttpGatewayConfig {
    let gateway = HttpGatewayConfig::new(config.presence.service_url.clone()).with_timeouts(
        secs(config.presence.request_timeout),
        secs(config.presence.connect_timeout),
    );
    match access_token.filter(|t| !t.trim().is_empty()) {
        Some(token) => gateway.with_access_token(token),
        None => gateway,
    }
}

/// Wire a presence client for `user_id` against the configured service.
pub fn build_client(
    config: &BeaconConfig,
    user_id: Option<&str>,
    host: HostLifecycle,
) -> Result<PresenceClient, BeaconError> {
    let token = std::env::var(ACCESS_TOKEN_VAR).ok();
    if token.is_none() {
        tracing::warn!("{ACCESS_TOKEN_VAR} is not set, requests will be unauthenticated");
    }

    let gateway = HttpGateway::new(gateway_config(config, token)).map_err(PresenceError::from)?;
    let identity = Identity::new(user_id.unwrap_or_default());

    Ok(PresenceClient::new(
        Arc::new(gateway),
        Arc::new(identity),
        host,
        presence_options(config),
    ))
}

fn secs(value: u32) -> Duration {
    Duration::from_secs(u64::from(value))
}
