//! Configuration schema types for Beacon.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults below.

mod logging;
mod presence;
mod worker;

pub use logging::*;
pub use presence::*;
pub use worker::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Beacon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    pub presence: PresenceConfig,
    pub worker: WorkerConfig,
    pub logging: LoggingConfig,
}
