//! Options, status values and request/response payloads.

use std::fmt;
use std::time::Duration;

use beacon_common::PersonId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Runtime options for the presence client and its worker.
#[derive(Debug, Clone)]
pub struct PresenceOptions {
    /// Start the worker automatically when the host becomes ready.
    pub initialize_worker: bool,
    /// Subscription lifetime requested from the service.
    pub subscription_ttl: Duration,
    /// Time between groundskeeper passes.
    pub groundskeeper_interval: Duration,
    /// Renew subscriptions that expire within this margin.
    pub renew_margin: Duration,
    /// Capacity of the presence event channel.
    pub event_capacity: usize,
}

impl Default for PresenceOptions {
    fn default() -> Self {
        Self {
            initialize_worker: false,
            subscription_ttl: Duration::from_secs(600),
            groundskeeper_interval: Duration::from_secs(20),
            renew_margin: Duration::from_secs(60),
            event_capacity: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// Status values
// ---------------------------------------------------------------------------

/// A presence status kind. Unrecognised service values pass through as
/// [`StatusValue::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusValue {
    Active,
    Inactive,
    /// Do not disturb. Status updates with this value carry no label.
    Dnd,
    Ooo,
    Meeting,
    Call,
    Presenting,
    Other(String),
}

impl StatusValue {
    /// Parse a caller-supplied status. Returns `None` for a blank string.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self::from(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusValue::Active => "active",
            StatusValue::Inactive => "inactive",
            StatusValue::Dnd => "dnd",
            StatusValue::Ooo => "ooo",
            StatusValue::Meeting => "meeting",
            StatusValue::Call => "call",
            StatusValue::Presenting => "presenting",
            StatusValue::Other(s) => s,
        }
    }

    pub fn is_dnd(&self) -> bool {
        matches!(self, StatusValue::Dnd)
    }
}

impl From<String> for StatusValue {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "active" => StatusValue::Active,
            "inactive" => StatusValue::Inactive,
            "dnd" => StatusValue::Dnd,
            "ooo" => StatusValue::Ooo,
            "meeting" => StatusValue::Meeting,
            "call" => StatusValue::Call,
            "presenting" => StatusValue::Presenting,
            _ => StatusValue::Other(value),
        }
    }
}

impl From<StatusValue> for String {
    fn from(value: StatusValue) -> Self {
        match value {
            StatusValue::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl AsRef<str> for StatusValue {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decoded records
// ---------------------------------------------------------------------------

/// A person's presence as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_time: Option<String>,
    #[serde(default, rename = "expiresTTL", skip_serializing_if = "Option::is_none")]
    pub expires_ttl: Option<i64>,
}

impl StatusRecord {
    pub fn person_id(&self) -> Option<PersonId> {
        PersonId::new(self.subject.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusList {
    #[serde(default)]
    pub status_list: Vec<StatusRecord>,
}

/// Outcome of subscribing to one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SubscriptionResponses {
    #[serde(default)]
    pub responses: Vec<SubscriptionResponse>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of a status update.
///
/// `label` carries the current user id for every status except
/// [`StatusValue::Dnd`], where it is left out of the payload entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub subject: String,
    pub event_type: &'static str,
    pub status: StatusValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Seconds until the service reverts the status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl StatusUpdateRequest {
    pub fn new(status: StatusValue, user_id: String, ttl: Option<Duration>) -> Self {
        let label = if status.is_dnd() {
            None
        } else {
            Some(user_id.clone())
        };
        Self {
            subject: user_id,
            event_type: "status",
            status,
            label,
            ttl: ttl.map(|d| d.as_secs()),
        }
    }
}

/// Body of a subscription request for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionRequest<'a> {
    pub subjects: &'a [PersonId],
    pub subscription_ttl: u64,
    pub include_status: bool,
}
