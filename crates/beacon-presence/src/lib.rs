//! Presence for Beacon: query, subscribe to, and publish user status
//! against the presence service, plus a background worker that keeps
//! watched subscriptions alive.

pub mod error;
pub mod gateway;
pub mod identity;
pub mod presence;
pub mod worker;

#[cfg(test)]
mod testing;

pub use error::{PresenceError, PresenceResult, TransportError, ValidationError};
pub use gateway::{HttpGateway, HttpGatewayConfig, Method, Request, RequestGateway, Response};
pub use identity::{Identity, IdentityContext};
pub use presence::{
    BatchSubscriptionManager, PresenceClient, PresenceOptions, StatusRecord, StatusUpdateRequest,
    StatusValue, SubscriptionResponse, BATCH_LIMIT,
};
pub use worker::{Groundskeeper, GroundskeeperOptions, PresenceWorker, WorkerRoutine, WorkerState};
