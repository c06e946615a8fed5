//! Single-attempt request execution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::correlation::CorrelationId;
use crate::errors::{classify, ClassifiedError, Failure, FailureContext};
use crate::models::Endpoint;
use crate::transport::{Transport, TransportError};

/// One attempt of one logical request.
///
/// Immutable: a retry gets a new descriptor from [`next_attempt`](Self::next_attempt)
/// that keeps the body and correlation id.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    endpoint: Endpoint,
    body: Arc<Value>,
    attempt: u32,
    correlation_id: CorrelationId,
}

impl RequestDescriptor {
    /// First attempt of a new logical request.
    pub fn new(endpoint: Endpoint, body: Value, correlation_id: CorrelationId) -> Self {
        Self {
            endpoint,
            body: Arc::new(body),
            attempt: 1,
            correlation_id,
        }
    }

    pub fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }
}

/// Runs exactly one attempt against the drug database.
///
/// Stateless between calls: nothing survives from one attempt to the next.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, timeout: Duration) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Send the request and parse the JSON body.
    ///
    /// If no response arrives within the timeout the transport future is
    /// dropped, which cancels the in-flight call. The payload is returned as
    /// parsed; checking it against the expected type is the caller's job.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<Value, ClassifiedError> {
        let path = descriptor.endpoint().path();
        let url = format!("{}{}", self.base_url, path);
        let context = FailureContext::attempt(path, descriptor.attempt());

        debug!(
            correlation_id = %descriptor.correlation_id(),
            endpoint = path,
            attempt = descriptor.attempt(),
            "sending drug database request"
        );

        let outcome =
            tokio::time::timeout(self.timeout, self.transport.post_json(&url, descriptor.body()))
                .await;

        let response = match outcome {
            Err(_elapsed) => {
                return Err(classify(Failure::Timeout { after: self.timeout }, context));
            }
            Ok(Err(TransportError::Timeout)) => {
                return Err(classify(Failure::Timeout { after: self.timeout }, context));
            }
            Ok(Err(TransportError::Connect(message))) => {
                return Err(classify(Failure::Connection { message }, context));
            }
            Ok(Err(TransportError::Decode { status, message })) => {
                return Err(classify(
                    Failure::MalformedBody {
                        status,
                        message,
                        body: String::new(),
                    },
                    context,
                ));
            }
            Ok(Err(TransportError::Other(message))) => {
                return Err(classify(Failure::Other { message }, context));
            }
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            return Err(classify(
                Failure::Status {
                    status: response.status,
                    body: response.body,
                },
                context,
            ));
        }

        if response.body.trim().is_empty() {
            return Err(classify(
                Failure::EmptyBody {
                    status: response.status,
                },
                context,
            ));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            classify(
                Failure::MalformedBody {
                    status: response.status,
                    message: e.to_string(),
                    body: response.body.clone(),
                },
                context,
            )
        })
    }
}
