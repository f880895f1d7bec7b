//! Lazily started background presence work.
//!
//! [`PresenceWorker`] gates when the background routine starts: never
//! before the host is ready (unless auto-init is on), and at most once.
//! [`Groundskeeper`] is the routine the presence client installs.

mod groundskeeper;
mod state;

pub use groundskeeper::{Groundskeeper, GroundskeeperOptions};
pub use state::{PresenceWorker, WorkerRoutine, WorkerState};
