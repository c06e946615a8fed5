//! Mapping raw failure observations onto the error taxonomy.
//!
//! [`classify`] is pure: it builds a value and nothing else. Logging is the
//! caller's job once it knows what it is going to do with the error.

use std::time::Duration;

use super::{ClassifiedError, ErrorDetails, ErrorKind};

/// Longest raw response excerpt kept in error details, in characters.
const RESPONSE_EXCERPT_CHARS: usize = 200;

/// A validation rule violation, raised before any network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    kind: ErrorKind,
    fields: Vec<String>,
    message: String,
    suggestion: String,
}

impl Violation {
    /// Generic input violation on one or more fields.
    pub fn input(fields: &[&str], message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::of_kind(ErrorKind::InvalidInput, fields, message, suggestion)
    }

    pub fn registration_number(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::of_kind(
            ErrorKind::InvalidRegistrationNumber,
            &["registration_number"],
            message,
            suggestion,
        )
    }

    pub fn atc_code(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::of_kind(ErrorKind::InvalidAtcCode, &["atc_code"], message, suggestion)
    }

    fn of_kind(
        kind: ErrorKind,
        fields: &[&str],
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        debug_assert!(kind.is_invalid_input());
        Self {
            kind,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A raw failure, as observed by the validator or the executor.
#[derive(Clone, Debug)]
pub enum Failure {
    /// Input validation failed.
    Validation(Violation),
    /// The attempt exceeded its deadline and was cancelled.
    Timeout { after: Duration },
    /// DNS, refused, reset, or a broken body stream.
    Connection { message: String },
    /// Non-2xx response.
    Status { status: u16, body: String },
    /// 2xx response without a body.
    EmptyBody { status: u16 },
    /// 2xx response whose body is not JSON.
    MalformedBody {
        status: u16,
        message: String,
        body: String,
    },
    /// JSON that does not match the expected payload type.
    UnexpectedShape { message: String },
    /// Client-side failure that is none of the above.
    Other { message: String },
}

/// Where the failure was observed.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailureContext<'a> {
    pub endpoint: Option<&'a str>,
    pub attempt: Option<u32>,
}

impl<'a> FailureContext<'a> {
    pub fn attempt(endpoint: &'a str, attempt: u32) -> Self {
        Self {
            endpoint: Some(endpoint),
            attempt: Some(attempt),
        }
    }

    pub fn endpoint(endpoint: &'a str) -> Self {
        Self {
            endpoint: Some(endpoint),
            attempt: None,
        }
    }
}

/// Classify a raw failure.
///
/// Rules, in priority order:
/// 1. validation failures → `InvalidInput` family, never retryable
/// 2. timeouts → `Timeout`
/// 3. connection failures → `ConnectionFailure`
/// 4. 429 → `RateLimited`; 408/500/502/503/504 → `TransientServerError`
/// 5. 400/401/403/404 → `PermanentServerError`
/// 6. empty or unparseable bodies → `InvalidResponseShape` / `InvalidResponseEncoding`
///
/// Any other status is `UnknownServerError`; other client-side failures are `Unexpected`.
pub fn classify(failure: Failure, context: FailureContext<'_>) -> ClassifiedError {
    let mut details = ErrorDetails {
        endpoint: context.endpoint.map(str::to_string),
        attempt: context.attempt,
        ..ErrorDetails::default()
    };

    match failure {
        Failure::Validation(violation) => {
            details.fields = violation.fields;
            ClassifiedError::new(violation.kind, violation.message)
                .with_details(details)
                .with_suggestion(violation.suggestion)
        }
        Failure::Timeout { after } => ClassifiedError::new(
            ErrorKind::Timeout,
            format!("No response within {} ms", after.as_millis()),
        )
        .with_details(details),
        Failure::Connection { message } => ClassifiedError::new(
            ErrorKind::ConnectionFailure,
            format!("Connection failed: {}", message),
        )
        .with_details(details),
        Failure::Status { status, body } => {
            let kind = kind_for_status(status);
            details.status = Some(status);
            details.response_excerpt = excerpt(&body);
            let error =
                ClassifiedError::new(kind, format!("HTTP {}", status)).with_details(details);
            match status_hint(status) {
                Some(hint) => error.with_suggestion(hint),
                None => error,
            }
        }
        Failure::EmptyBody { status } => {
            details.status = Some(status);
            ClassifiedError::new(
                ErrorKind::InvalidResponseShape,
                format!("HTTP {} with an empty body", status),
            )
            .with_details(details)
        }
        Failure::MalformedBody {
            status,
            message,
            body,
        } => {
            details.status = Some(status);
            details.response_excerpt = excerpt(&body);
            ClassifiedError::new(
                ErrorKind::InvalidResponseEncoding,
                format!("Response is not valid JSON: {}", message),
            )
            .with_details(details)
        }
        Failure::UnexpectedShape { message } => ClassifiedError::new(
            ErrorKind::InvalidResponseShape,
            format!("Response does not match the expected structure: {}", message),
        )
        .with_details(details),
        Failure::Other { message } => {
            ClassifiedError::new(ErrorKind::Unexpected, message).with_details(details)
        }
    }
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        429 => ErrorKind::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorKind::TransientServerError,
        400 | 401 | 403 | 404 => ErrorKind::PermanentServerError,
        _ => ErrorKind::UnknownServerError,
    }
}

fn status_hint(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("The drug database rejected the request parameters."),
        401 | 403 => Some("Access to the drug database was denied."),
        404 => Some("No record matches the request."),
        _ => None,
    }
}

fn excerpt(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(RESPONSE_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        Some(format!("{}…", head))
    } else {
        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Severity;

    fn status(code: u16) -> ClassifiedError {
        classify(
            Failure::Status {
                status: code,
                body: String::new(),
            },
            FailureContext::attempt("/search/name", 1),
        )
    }

    #[test]
    fn test_validation_keeps_kind_and_fields() {
        let violation = Violation::input(&["page"], "page must be >= 1", "Pages start at 1.");
        let error = classify(Failure::Validation(violation), FailureContext::default());
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.details().fields, vec!["page".to_string()]);
        assert_eq!(error.suggestions()[0], "Pages start at 1.");
        assert!(!error.retryable());
    }

    #[test]
    fn test_registration_violation_is_medium() {
        let violation = Violation::registration_number("bad", "fix it");
        let error = classify(Failure::Validation(violation), FailureContext::default());
        assert_eq!(error.kind(), ErrorKind::InvalidRegistrationNumber);
        assert_eq!(error.severity(), Severity::Medium);
        assert_eq!(error.details().fields, vec!["registration_number".to_string()]);
    }

    #[test]
    fn test_timeout_is_retryable_high() {
        let error = classify(
            Failure::Timeout {
                after: Duration::from_millis(30_000),
            },
            FailureContext::attempt("/autocomplete", 2),
        );
        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert_eq!(error.severity(), Severity::High);
        assert!(error.retryable());
        assert_eq!(error.details().attempt, Some(2));
        assert_eq!(error.message(), "No response within 30000 ms");
    }

    #[test]
    fn test_connection_failure_is_retryable() {
        let error = classify(
            Failure::Connection {
                message: "connection refused".into(),
            },
            FailureContext::default(),
        );
        assert_eq!(error.kind(), ErrorKind::ConnectionFailure);
        assert!(error.retryable());
    }

    #[test]
    fn test_transient_statuses() {
        assert_eq!(status(429).kind(), ErrorKind::RateLimited);
        for code in [408, 500, 502, 503, 504] {
            let error = status(code);
            assert_eq!(error.kind(), ErrorKind::TransientServerError, "{code}");
            assert!(error.retryable(), "{code}");
            assert_eq!(error.details().status, Some(code));
        }
    }

    #[test]
    fn test_permanent_statuses() {
        for code in [400, 401, 403, 404] {
            let error = status(code);
            assert_eq!(error.kind(), ErrorKind::PermanentServerError, "{code}");
            assert_eq!(error.severity(), Severity::Medium);
            assert!(!error.retryable(), "{code}");
        }
    }

    #[test]
    fn test_other_statuses_are_unknown() {
        for code in [301, 409, 418, 501] {
            let error = status(code);
            assert_eq!(error.kind(), ErrorKind::UnknownServerError, "{code}");
            assert!(!error.retryable());
        }
    }

    #[test]
    fn test_bad_bodies_are_not_retryable() {
        let empty = classify(Failure::EmptyBody { status: 200 }, FailureContext::default());
        assert_eq!(empty.kind(), ErrorKind::InvalidResponseShape);
        assert!(!empty.retryable());

        let malformed = classify(
            Failure::MalformedBody {
                status: 200,
                message: "expected value at line 1 column 1".into(),
                body: "<html>".into(),
            },
            FailureContext::default(),
        );
        assert_eq!(malformed.kind(), ErrorKind::InvalidResponseEncoding);
        assert_eq!(malformed.severity(), Severity::High);
        assert_eq!(malformed.details().response_excerpt.as_deref(), Some("<html>"));
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let body = "x".repeat(500);
        let error = classify(
            Failure::Status { status: 500, body },
            FailureContext::default(),
        );
        let excerpt = error.details().response_excerpt.clone().unwrap();
        assert_eq!(excerpt.chars().count(), RESPONSE_EXCERPT_CHARS + 1);
        assert!(excerpt.ends_with('…'));
    }

    #[test]
    fn test_not_found_gets_specific_hint() {
        let error = status(404);
        assert_eq!(error.suggestions()[0], "No record matches the request.");
    }
}
