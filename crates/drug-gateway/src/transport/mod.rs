//! Transport trait definitions.
//!
//! A [`Transport`] performs exactly one JSON POST and reports what happened
//! on the wire. It does not interpret statuses, parse bodies or retry; the
//! [`RequestExecutor`](crate::executor::RequestExecutor) does that.

mod reqwest_transport;

#[cfg(test)]
pub(crate) mod scripted;

pub use reqwest_transport::{ReqwestTransport, USER_AGENT};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Status and body of an HTTP response, uninterpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying client gave up waiting.
    #[error("Request timed out")]
    Timeout,

    /// DNS, refused, reset, or a body stream that broke mid-read.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The response arrived but its body could not be decoded as text.
    #[error("Failed to decode HTTP {status} response body: {message}")]
    Decode { status: u16, message: String },

    /// Anything else, e.g. a request that could not be built.
    #[error("Transport error: {0}")]
    Other(String),
}

/// Sends one JSON POST request.
///
/// Implementations must be cheap to share: the gateway holds one instance for
/// the life of the process and calls it from concurrent requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, TransportError>;
}
