//! Subscription fan-out over the service's per-request id limit.

use std::sync::Arc;
use std::time::Duration;

use beacon_common::PersonId;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::{PresenceResult, TransportError};
use crate::gateway::{Request, RequestGateway};

use super::types::{SubscriptionRequest, SubscriptionResponse, SubscriptionResponses};

/// Maximum number of subjects the service accepts per subscription request.
pub const BATCH_LIMIT: usize = 100;

pub(crate) const SUBSCRIPTIONS_PATH: &str = "subscriptions";

/// Splits subscription requests into batches of at most [`BATCH_LIMIT`]
/// ids and sends them concurrently.
pub struct BatchSubscriptionManager {
    gateway: Arc<dyn RequestGateway>,
}

impl BatchSubscriptionManager {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Subscribe to every id in `ids` for `ttl`.
    ///
    /// Order is preserved both across batches and in the returned
    /// responses. All batch requests settle before this returns; if any
    /// failed, the first failure (in batch order) is returned and batches
    /// that succeeded stay subscribed on the service.
    pub async fn subscribe(
        &self,
        ids: &[PersonId],
        ttl: Duration,
    ) -> PresenceResult<Vec<SubscriptionResponse>> {
        let batches: Vec<&[PersonId]> = ids.chunks(BATCH_LIMIT).collect();
        debug!(ids = ids.len(), batches = batches.len(), "subscribing");

        let results = join_all(
            batches
                .iter()
                .map(|batch| self.subscribe_batch(batch, ttl)),
        )
        .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, batches = batches.len(), "subscription batches failed");
        }

        let mut responses = Vec::with_capacity(ids.len());
        for result in results {
            responses.extend(result?);
        }
        Ok(responses)
    }

    async fn subscribe_batch(
        &self,
        batch: &[PersonId],
        ttl: Duration,
    ) -> Result<Vec<SubscriptionResponse>, TransportError> {
        let response = self.gateway.request(batch_request(batch, ttl)?).await?;
        Ok(response
            .decode_optional::<SubscriptionResponses>()?
            .map(|r| r.responses)
            .unwrap_or_default())
    }
}

/// Build the subscription request for one batch. A zero `ttl` removes
/// the subscriptions.
pub(crate) fn batch_request(
    batch: &[PersonId],
    ttl: Duration,
) -> Result<Request, TransportError> {
    let body = SubscriptionRequest {
        subjects: batch,
        subscription_ttl: ttl.as_secs(),
        include_status: true,
    };
    Request::post_json(SUBSCRIPTIONS_PATH, &body)
}
