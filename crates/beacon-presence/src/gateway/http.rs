//! Default `RequestGateway` over HTTPS using reqwest.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use beacon_common::new_tracking_id;
use tracing::{debug, warn};

use super::{Method, Request, RequestGateway, Response};
use crate::error::TransportError;

/// Maximum number of characters of an error body kept in `TransportError`.
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Clone)]
pub struct HttpGatewayConfig {
    /// Base URL every request path is joined onto.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl fmt::Debug for HttpGatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGatewayConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl HttpGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }

    pub(crate) fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub struct HttpGateway {
    config: HttpGatewayConfig,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
    }
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn request(&self, request: Request) -> Result<Response, TransportError> {
        let url = self.config.url_for(&request.path);
        let tracking_id = new_tracking_id();

        debug!(method = %request.method, path = %request.path, tracking_id = %tracking_id, "presence request");

        let mut builder = self
            .http
            .request(to_reqwest(request.method), &url)
            .header("TrackingID", &tracking_id);
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(ERROR_BODY_LIMIT).collect::<String>();
            warn!(status = status.as_u16(), tracking_id = %tracking_id, "presence request failed");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let bytes = response.bytes().await.map_err(map_send_error)?;
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| TransportError::InvalidBody(e.to_string()))?
        };

        Ok(Response::new(status.as_u16(), body))
    }
}
