//! Background presence worker configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Seconds between renewal/eviction passes (valid range: 5-3600).
    pub groundskeeper_interval: u32,
    /// Renew a subscription when it expires within this many seconds
    /// (valid range: 0-3600).
    pub renew_margin: u32,
    /// Capacity of the presence event channel (valid range: 16-65536).
    pub event_capacity: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            groundskeeper_interval: 20,
            renew_margin: 60,
            event_capacity: 256,
        }
    }
}
