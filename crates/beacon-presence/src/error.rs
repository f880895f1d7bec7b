//! Error types for presence operations.

use beacon_common::BeaconError;

/// The caller passed a missing or malformed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A person id is required")]
    MissingPersonId,
    #[error("An array of person ids is required")]
    MissingPersonIds,
    #[error("A status is required")]
    MissingStatus,
    /// Status updates are labelled with the current user's id.
    #[error("A current user id is required")]
    MissingUserId,
}

/// A request failed in the gateway. Surfaced to callers unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    InvalidBody(String),
    #[error("request timed out")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PresenceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PresenceError::Validation(_))
    }
}

impl From<PresenceError> for BeaconError {
    fn from(err: PresenceError) -> Self {
        BeaconError::Presence(err.to_string())
    }
}

pub type PresenceResult<T> = Result<T, PresenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::MissingPersonId.to_string(),
            "A person id is required"
        );
        assert_eq!(
            ValidationError::MissingPersonIds.to_string(),
            "An array of person ids is required"
        );
        assert_eq!(
            ValidationError::MissingStatus.to_string(),
            "A status is required"
        );
        assert_eq!(
            ValidationError::MissingUserId.to_string(),
            "A current user id is required"
        );
    }

    #[test]
    fn presence_error_is_transparent() {
        let err: PresenceError = ValidationError::MissingStatus.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "A status is required");

        let err: PresenceError = TransportError::Status {
            status: 503,
            body: "unavailable".into(),
        }
        .into();
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn converts_into_beacon_error() {
        let err: BeaconError = PresenceError::from(TransportError::Timeout).into();
        assert_eq!(err.to_string(), "presence error: request timed out");
    }
}
