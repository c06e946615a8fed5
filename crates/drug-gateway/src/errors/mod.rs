//! Error types and retry classification for the drug database gateway.
//!
//! This module provides:
//! - [`ClassifiedError`]: The single error type returned by every gateway operation
//! - [`ErrorKind`] / [`Severity`]: The closed taxonomy behind it
//! - [`RetryClass`]: Classification for determining retry behavior
//! - [`classify`]: Maps a raw [`Failure`] observation to a [`ClassifiedError`]

mod classify;
mod kind;
mod retry;

pub use classify::{classify, Failure, FailureContext, Violation};
pub use kind::{ErrorKind, Severity};
pub use retry::RetryClass;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::correlation::CorrelationId;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, ClassifiedError>;

/// Diagnostic context attached to an error. Never used for control flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,

    /// HTTP status, when the failure came from a response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Names of the request fields that failed validation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Truncated raw response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_excerpt: Option<String>,
}

/// A failure observation, classified.
///
/// Created exactly once per failure. The only change made afterwards is
/// attaching the request's correlation id, which consumes the value and
/// returns a new one.
#[derive(Error, Clone, Debug, Serialize)]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<CorrelationId>,
    suggestions: Vec<String>,
    details: ErrorDetails,
    timestamp: DateTime<Utc>,
}

impl ClassifiedError {
    /// Create an error of the given kind with its default severity and suggestions.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            correlation_id: None,
            suggestions: kind
                .default_suggestions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            details: ErrorDetails::default(),
            timestamp: Utc::now(),
        }
    }

    /// Attach diagnostic details.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = details;
        self
    }

    /// Put a more specific hint ahead of the kind's default suggestions.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.insert(0, suggestion.into());
        self
    }

    /// Stamp the error with the correlation id of the logical request.
    ///
    /// Overrides any id already present; a request has exactly one id.
    pub fn with_correlation_id(mut self, id: CorrelationId) -> Self {
        self.correlation_id = Some(id);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the retry loop may repeat the attempt. Depends on the kind only.
    pub fn retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn retry_class(&self) -> RetryClass {
        self.kind.retry_class()
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind.is_invalid_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_kind_defaults() {
        let error = ClassifiedError::new(ErrorKind::Timeout, "no answer after 30s");
        assert_eq!(error.severity(), Severity::High);
        assert!(error.retryable());
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
        assert!(error.correlation_id().is_none());
        assert_eq!(
            error.suggestions().len(),
            ErrorKind::Timeout.default_suggestions().len()
        );
    }

    #[test]
    fn test_specific_suggestion_comes_first() {
        let error = ClassifiedError::new(ErrorKind::InvalidInput, "page must be >= 1")
            .with_suggestion("Pages start at 1.");
        assert_eq!(error.suggestions()[0], "Pages start at 1.");
        assert!(error.suggestions().len() > 1);
    }

    #[test]
    fn test_correlation_id_is_overridden_not_accumulated() {
        let first = CorrelationId::from_string("a");
        let second = CorrelationId::from_string("b");
        let error = ClassifiedError::new(ErrorKind::RateLimited, "429")
            .with_correlation_id(first)
            .with_correlation_id(second.clone());
        assert_eq!(error.correlation_id(), Some(&second));
    }

    #[test]
    fn test_error_display() {
        let error = ClassifiedError::new(ErrorKind::PermanentServerError, "HTTP 404");
        assert_eq!(format!("{}", error), "permanent_server_error: HTTP 404");
    }

    #[test]
    fn test_serialized_form_skips_empty_details() {
        let error = ClassifiedError::new(ErrorKind::InvalidInput, "bad")
            .with_correlation_id(CorrelationId::from_string("req-1"));
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["kind"], "invalid_input");
        assert_eq!(json["severity"], "low");
        assert_eq!(json["correlation_id"], "req-1");
        assert!(json["details"].as_object().unwrap().is_empty());
    }
}
