//! Presence client: the single entry point for presence operations.

use std::sync::Arc;
use std::time::Duration;

use beacon_common::{HostLifecycle, PersonId, PresenceEvent};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{PresenceResult, ValidationError};
use crate::gateway::{Request, RequestGateway};
use crate::identity::IdentityContext;
use crate::worker::{Groundskeeper, GroundskeeperOptions, PresenceWorker, WorkerState};

use super::batch::{batch_request, BatchSubscriptionManager};
use super::types::{
    PresenceOptions, StatusList, StatusRecord, StatusUpdateRequest, StatusValue,
    SubscriptionResponse, SubscriptionResponses,
};

pub(crate) const COMPOSITIONS_PATH: &str = "compositions";
pub(crate) const EVENTS_PATH: &str = "events";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Presence client for the current user.
pub struct PresenceClient {
    gateway: Arc<dyn RequestGateway>,
    identity: Arc<dyn IdentityContext>,
    batch: Arc<BatchSubscriptionManager>,
    groundskeeper: Arc<Groundskeeper>,
    worker: Arc<PresenceWorker>,
    host: HostLifecycle,
    options: PresenceOptions,
}

impl PresenceClient {
    /// Build a client. With `options.initialize_worker` set, the worker
    /// starts on its own as soon as `host` becomes ready.
    pub fn new(
        gateway: Arc<dyn RequestGateway>,
        identity: Arc<dyn IdentityContext>,
        host: HostLifecycle,
        options: PresenceOptions,
    ) -> Self {
        let batch = Arc::new(BatchSubscriptionManager::new(Arc::clone(&gateway)));
        let groundskeeper =
            Groundskeeper::new(Arc::clone(&batch), GroundskeeperOptions::from(&options));
        let worker = PresenceWorker::new(groundskeeper.clone());

        if options.initialize_worker {
            let auto_worker = Arc::downgrade(&worker);
            host.once_ready(move || {
                if let Some(worker) = auto_worker.upgrade() {
                    worker.activate();
                }
            });
        }

        Self {
            gateway,
            identity,
            batch,
            groundskeeper,
            worker,
            host,
            options,
        }
    }

    /// Fetch one person's current presence.
    pub async fn get(&self, person_id: &str) -> PresenceResult<StatusRecord> {
        let id = person_id_arg(person_id)?;
        let path = format!(
            "{COMPOSITIONS_PATH}?userId={}",
            urlencoding::encode(id.as_str())
        );
        let response = self.gateway.request(Request::get(path)).await?;
        Ok(response.decode()?)
    }

    /// Fetch the presence of every id in one request.
    pub async fn list<S: AsRef<str>>(&self, person_ids: &[S]) -> PresenceResult<Vec<StatusRecord>> {
        let ids = person_ids_arg(person_ids, ValidationError::MissingPersonIds)?;
        let body = serde_json::json!({ "userIds": ids });
        let response = self
            .gateway
            .request(Request::post(COMPOSITIONS_PATH, body))
            .await?;
        Ok(response
            .decode_optional::<StatusList>()?
            .map(|list| list.status_list)
            .unwrap_or_default())
    }

    /// Subscribe to presence changes for every id, batching as needed.
    pub async fn subscribe<S: AsRef<str>>(
        &self,
        person_ids: &[S],
    ) -> PresenceResult<Vec<SubscriptionResponse>> {
        let ids = person_ids_arg(person_ids, ValidationError::MissingPersonId)?;
        self.batch.subscribe(&ids, self.options.subscription_ttl).await
    }

    /// Stop receiving presence changes for one person.
    pub async fn unsubscribe(&self, person_id: &str) -> PresenceResult<Vec<SubscriptionResponse>> {
        let id = person_id_arg(person_id)?;
        let request = batch_request(std::slice::from_ref(&id), Duration::ZERO)?;
        let response = self.gateway.request(request).await?;
        Ok(response
            .decode_optional::<SubscriptionResponses>()?
            .map(|r| r.responses)
            .unwrap_or_default())
    }

    /// Publish the current user's status.
    ///
    /// Returns the service's confirmation, or `None` if it replied
    /// without a body.
    pub async fn set_status(&self, status: &str) -> PresenceResult<Option<StatusRecord>> {
        self.set_status_with_ttl(status, None).await
    }

    /// Publish the current user's status, reverting after `ttl`.
    pub async fn set_status_with_ttl(
        &self,
        status: &str,
        ttl: Option<Duration>,
    ) -> PresenceResult<Option<StatusRecord>> {
        let status = StatusValue::parse(status).ok_or(ValidationError::MissingStatus)?;
        let user_id = self.identity.user_id();
        if user_id.trim().is_empty() {
            return Err(ValidationError::MissingUserId.into());
        }
        let update = StatusUpdateRequest::new(status, user_id, ttl);
        debug!(status = %update.status, labelled = update.label.is_some(), "setting status");

        let request = Request::post_json(EVENTS_PATH, &update)?;
        let response = self.gateway.request(request).await?;
        Ok(response.decode_optional()?)
    }

    /// Start watching a person. Returns the watch count.
    pub fn enqueue(&self, person_id: &str) -> PresenceResult<usize> {
        let id = person_id_arg(person_id)?;
        Ok(self.groundskeeper.enqueue(id))
    }

    /// Stop watching a person. Returns the remaining watch count.
    pub fn dequeue(&self, person_id: &str) -> PresenceResult<usize> {
        let id = person_id_arg(person_id)?;
        Ok(self.groundskeeper.dequeue(&id))
    }

    /// Latest presence the worker has seen for a person.
    pub fn cached(&self, person_id: &str) -> Option<StatusRecord> {
        PersonId::new(person_id).and_then(|id| self.groundskeeper.presence(&id))
    }

    /// Start the background worker, now or once the host is ready.
    ///
    /// When the host is already ready (or auto-init is on) the worker's
    /// routine has started by the time this resolves.
    pub async fn initialize_worker(&self) -> WorkerState {
        self.worker
            .initialize_worker(&self.host, self.options.initialize_worker)
    }

    pub fn worker_state(&self) -> WorkerState {
        self.worker.state()
    }

    /// Presence updates published by the background worker.
    pub fn events(&self) -> broadcast::Receiver<PresenceEvent> {
        self.groundskeeper.subscribe_events()
    }

    pub fn groundskeeper(&self) -> &Arc<Groundskeeper> {
        &self.groundskeeper
    }
}

impl Drop for PresenceClient {
    fn drop(&mut self) {
        self.groundskeeper.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Argument validation
// ---------------------------------------------------------------------------

fn person_id_arg(person_id: &str) -> Result<PersonId, ValidationError> {
    PersonId::new(person_id).ok_or(ValidationError::MissingPersonId)
}

/// Every id must be present; an empty sequence is rejected with `missing`.
fn person_ids_arg<S: AsRef<str>>(
    person_ids: &[S],
    missing: ValidationError,
) -> Result<Vec<PersonId>, ValidationError> {
    if person_ids.is_empty() {
        return Err(missing);
    }
    person_ids
        .iter()
        .map(|id| PersonId::new(id.as_ref()).ok_or(missing))
        .collect()
}
