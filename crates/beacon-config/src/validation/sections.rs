//! Validation for the presence and worker sections.

use crate::schema::BeaconConfig;

use super::helpers::{validate_http_url, validate_range};

/// Validate presence service constraints.
pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &BeaconConfig) {
    validate_http_url(errors, "presence.service_url", &config.presence.service_url);
    validate_range(
        errors,
        "presence.subscription_ttl",
        config.presence.subscription_ttl,
        60,
        86_400,
    );
    validate_range(
        errors,
        "presence.request_timeout",
        config.presence.request_timeout,
        1,
        300,
    );
    validate_range(
        errors,
        "presence.connect_timeout",
        config.presence.connect_timeout,
        1,
        60,
    );
}

/// Validate worker constraints.
pub(crate) fn validate_worker(errors: &mut Vec<String>, config: &BeaconConfig) {
    validate_range(
        errors,
        "worker.groundskeeper_interval",
        config.worker.groundskeeper_interval,
        5,
        3600,
    );
    validate_range(errors, "worker.renew_margin", config.worker.renew_margin, 0, 3600);
    validate_range(
        errors,
        "worker.event_capacity",
        config.worker.event_capacity,
        16,
        65_536,
    );

    if config.worker.renew_margin >= config.presence.subscription_ttl {
        errors.push(format!(
            "worker.renew_margin = {} must be less than presence.subscription_ttl = {}",
            config.worker.renew_margin, config.presence.subscription_ttl
        ));
    }
}
