//! Presence client over the presence service's REST API.
//!
//! Validates arguments, shapes request payloads, and fans subscription
//! requests out in batches. Transport is delegated to a
//! [`RequestGateway`](crate::gateway::RequestGateway).

mod batch;
mod client;
mod types;


pub use batch::{BatchSubscriptionManager, BATCH_LIMIT};
pub use client::PresenceClient;
pub use types::{
    PresenceOptions, StatusRecord, StatusUpdateRequest, StatusValue, SubscriptionResponse,
};
