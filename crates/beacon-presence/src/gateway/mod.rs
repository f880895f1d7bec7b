//! The request seam between presence logic and the transport.
//!
//! Everything above this module builds [`Request`] values and decodes
//! [`Response`] bodies; auth, retries and connection handling belong to
//! the [`RequestGateway`] implementation.

mod http;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TransportError;

pub use http::{HttpGateway, HttpGatewayConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        f.write_str(name)
    }
}

/// A request description, relative to the presence service base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// POST with `body` serialized to JSON.
    pub fn post_json<T: Serialize>(
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, TransportError> {
        let body = serde_json::to_value(body)
            .map_err(|e| TransportError::InvalidBody(format!("failed to encode request: {e}")))?;
        Ok(Self::post(path, body))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    /// Parsed JSON body; `Null` when the service sent no content.
    pub body: serde_json::Value,
}

impl Response {
    pub fn new(status_code: u16, body: serde_json::Value) -> Self {
        Self { status_code, body }
    }

    pub fn no_content() -> Self {
        Self::new(204, serde_json::Value::Null)
    }

    /// Decode the body into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, TransportError> {
        serde_json::from_value(self.body).map_err(|e| TransportError::InvalidBody(e.to_string()))
    }

    /// Decode the body into `T`, or `None` if the service sent no content.
    pub fn decode_optional<T: DeserializeOwned>(self) -> Result<Option<T>, TransportError> {
        if self.body.is_null() {
            return Ok(None);
        }
        self.decode().map(Some)
    }
}

#[async_trait]
pub trait RequestGateway: Send + Sync {
    async fn request(&self, request: Request) -> Result<Response, TransportError>;
}
