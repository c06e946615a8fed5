/// Classification for retry policy.
///
/// Used by the retry loop to decide whether a failed attempt may be repeated.
/// The class is derived from the error kind alone; attempt counts and caller
/// state never influence it.
///
/// # Behavior Summary
///
/// | Class | Retried? | Examples |
/// |-------|----------|----------|
/// | `Never` | No | bad input, 404, malformed payload |
/// | `WithBackoff` | Yes, with linear backoff | timeout, connection reset, 429, 503 |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request itself has to change before it can succeed.
    Never,

    /// Transient failure. Retry after a delay, up to the policy's attempt limit.
    WithBackoff,
}

impl RetryClass {
    /// Returns `true` if this class allows another attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::WithBackoff)
    }
}
