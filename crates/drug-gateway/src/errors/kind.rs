//! The closed set of failure kinds and their static properties.

use std::fmt;

use serde::Serialize;

use super::RetryClass;

/// How urgently a failure needs human attention.
///
/// Ordered from least to most severe so callers can filter with `>=`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a gateway call can fail.
///
/// The enum is exhaustive on purpose: adding a variant forces every `match`
/// on it (retry class, severity, suggestions) to be revisited.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller input failed a shape or range check.
    InvalidInput,
    /// Registration number is not in the `DDD DD DDDDD DD` format.
    InvalidRegistrationNumber,
    /// ATC code is not a level-4 code (and could not be coerced into one).
    InvalidAtcCode,

    /// No response within the configured timeout.
    Timeout,
    /// DNS failure, refused or reset connection.
    ConnectionFailure,
    /// HTTP 429.
    RateLimited,
    /// HTTP 408, 500, 502, 503 or 504.
    TransientServerError,
    /// HTTP 400, 401, 403 or 404.
    PermanentServerError,
    /// Any other non-2xx status.
    UnknownServerError,

    /// 2xx with an empty body, or a payload that does not fit the expected type.
    InvalidResponseShape,
    /// 2xx with a body that is not valid JSON.
    InvalidResponseEncoding,

    /// Client-side failure that fits none of the above (e.g. an unbuildable request).
    Unexpected,
}

impl ErrorKind {
    /// Stable snake_case code, used in log fields and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidRegistrationNumber => "invalid_registration_number",
            Self::InvalidAtcCode => "invalid_atc_code",
            Self::Timeout => "timeout",
            Self::ConnectionFailure => "connection_failure",
            Self::RateLimited => "rate_limited",
            Self::TransientServerError => "transient_server_error",
            Self::PermanentServerError => "permanent_server_error",
            Self::UnknownServerError => "unknown_server_error",
            Self::InvalidResponseShape => "invalid_response_shape",
            Self::InvalidResponseEncoding => "invalid_response_encoding",
            Self::Unexpected => "unexpected",
        }
    }

    /// Returns the retry classification for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use drug_gateway::errors::{ErrorKind, RetryClass};
    ///
    /// assert_eq!(ErrorKind::RateLimited.retry_class(), RetryClass::WithBackoff);
    /// assert_eq!(ErrorKind::PermanentServerError.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Transient - may succeed if repeated
            Self::Timeout
            | Self::ConnectionFailure
            | Self::RateLimited
            | Self::TransientServerError => RetryClass::WithBackoff,

            // Input problems never reach the network
            Self::InvalidInput | Self::InvalidRegistrationNumber | Self::InvalidAtcCode => {
                RetryClass::Never
            }

            // A malformed payload will not fix itself
            Self::PermanentServerError
            | Self::UnknownServerError
            | Self::InvalidResponseShape
            | Self::InvalidResponseEncoding
            | Self::Unexpected => RetryClass::Never,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.retry_class().is_retryable()
    }

    /// Returns `true` for the validation family (raised before any network call).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::InvalidRegistrationNumber | Self::InvalidAtcCode
        )
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidInput => Severity::Low,
            Self::InvalidRegistrationNumber | Self::InvalidAtcCode => Severity::Medium,
            Self::RateLimited | Self::PermanentServerError => Severity::Medium,
            Self::Timeout
            | Self::ConnectionFailure
            | Self::TransientServerError
            | Self::InvalidResponseShape
            | Self::InvalidResponseEncoding => Severity::High,
            Self::UnknownServerError | Self::Unexpected => Severity::Critical,
        }
    }

    /// Remediation hints shown to end users. No behavioral effect.
    pub fn default_suggestions(&self) -> &'static [&'static str] {
        match self {
            Self::InvalidInput => &["Check the request parameters and try again."],
            Self::InvalidRegistrationNumber => &[
                "Registration numbers use the format 'DDD DD DDDDD DD', e.g. '020 16 20534 00'.",
            ],
            Self::InvalidAtcCode => &[
                "Use a level-4 ATC code such as 'N02BE'.",
                "Level-5 codes such as 'N02BE01' are shortened automatically.",
            ],
            Self::Timeout => &[
                "The drug database did not answer in time; try again shortly.",
                "Increase DRUG_DB_TIMEOUT_MS if timeouts persist.",
            ],
            Self::ConnectionFailure => &[
                "Check network connectivity and DRUG_DB_BASE_URL.",
            ],
            Self::RateLimited => &["Too many requests; wait before retrying."],
            Self::TransientServerError => &[
                "The drug database is temporarily unavailable; try again later.",
            ],
            Self::PermanentServerError => &[
                "The request was rejected; verify the identifier or search criteria.",
            ],
            Self::UnknownServerError => &[
                "The drug database returned an unexpected status; report it with the correlation id.",
            ],
            Self::InvalidResponseShape | Self::InvalidResponseEncoding => &[
                "The drug database returned an unusable response; report it with the correlation id.",
            ],
            Self::Unexpected => &["Report this failure with the correlation id."],
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
