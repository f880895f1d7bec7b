use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::PersonId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresenceEvent {
    /// A watched person's presence changed or was refreshed.
    Updated {
        person_id: PersonId,
        status: String,
        last_active: Option<String>,
    },
    /// A cached presence was dropped because nobody watches it anymore.
    Evicted { person_id: PersonId },
    WorkerStarted,
    WorkerStopped,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<PresenceEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PresenceEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: PresenceEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
