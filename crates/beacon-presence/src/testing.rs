//! Test doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use beacon_common::PersonId;
use tokio::sync::Barrier;

use crate::error::TransportError;
use crate::gateway::{Request, RequestGateway, Response};

type Responder = Box<dyn Fn(&Request) -> Result<Response, TransportError> + Send + Sync>;

/// Gateway that records every request and answers from a closure.
pub(crate) struct RecordingGateway {
    requests: Mutex<Vec<Request>>,
    responder: Responder,
    barrier: Option<Barrier>,
}

impl RecordingGateway {
    pub(crate) fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            barrier: None,
        })
    }

    pub(crate) fn no_content() -> Arc<Self> {
        Self::new(|_| Ok(Response::no_content()))
    }

    /// Answers subscription requests with one `active` response per subject.
    pub(crate) fn echo_subscriptions() -> Arc<Self> {
        Self::new(|request| Ok(echo(request)))
    }

    /// Like `echo_subscriptions`, but every request waits until `n`
    /// requests are in flight.
    pub(crate) fn gated(n: usize) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(|request| Ok(echo(request))),
            barrier: Some(Barrier::new(n)),
        })
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestGateway for RecordingGateway {
    async fn request(&self, request: Request) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        (self.responder)(&request)
    }
}

fn echo(request: &Request) -> Response {
    let responses: Vec<serde_json::Value> = subjects_of(request)
        .into_iter()
        .map(|subject| {
            serde_json::json!({
                "subject": subject,
                "responseCode": 200,
                "status": { "subject": subject, "status": "active" }
            })
        })
        .collect();
    Response::new(200, serde_json::json!({ "responses": responses }))
}

/// `n` distinct person ids.
pub(crate) fn ids(n: usize) -> Vec<PersonId> {
    (0..n)
        .map(|i| PersonId::new(format!("person-{i}")).unwrap())
        .collect()
}

/// The `subjects` array of a subscription request body.
pub(crate) fn subjects_of(request: &Request) -> Vec<String> {
    request
        .body
        .as_ref()
        .and_then(|b| b["subjects"].as_array())
        .map(|subjects| {
            subjects
                .iter()
                .filter_map(|s| s.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
