//! Presence service configuration.

use serde::{Deserialize, Serialize};

/// Presence service and client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Base URL of the presence service API.
    pub service_url: String,
    /// Start the background worker automatically once the host is ready.
    pub initialize_worker: bool,
    /// Subscription lifetime requested from the service, in seconds
    /// (valid range: 60-86400).
    pub subscription_ttl: u32,
    /// Whole-request timeout in seconds (valid range: 1-300).
    pub request_timeout: u32,
    /// Connect timeout in seconds (valid range: 1-60).
    pub connect_timeout: u32,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            service_url: "https://presence.beacon.dev/api/v1".into(),
            initialize_worker: false,
            subscription_ttl: 600,
            request_timeout: 30,
            connect_timeout: 10,
        }
    }
}
