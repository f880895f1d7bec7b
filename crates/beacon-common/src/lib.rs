pub mod errors;
pub mod events;
pub mod id;
pub mod lifecycle;

pub use errors::{BeaconError, ConfigError};
pub use events::{EventBus, PresenceEvent};
pub use id::{new_id, new_tracking_id, PersonId};
pub use lifecycle::{HostLifecycle, ListenerId};

pub type Result<T> = std::result::Result<T, BeaconError>;
