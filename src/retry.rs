//! Rate limit retry policy.
//!
//! Only HTTP 429 is ever retried. The wait comes from the `Retry-After`
//! header, and the number of retries per call is bounded.

use http::HeaderMap;
use std::time::Duration;

/// Retries allowed per call after the first attempt.
pub const MAX_RETRIES: usize = 3;

/// Wait used when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// How a client reacts to rate limiting.
///
/// # Examples
///
/// ```
/// use togglr::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_retries, 3);
///
/// // Attempt 0 may wait and retry; attempt 3 may not.
/// assert_eq!(policy.delay_for(0, 2), Some(Duration::from_secs(2)));
/// assert_eq!(policy.delay_for(3, 2), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// The maximum number of retries after the first attempt.
    pub max_retries: usize,

    /// Seconds to wait when the server doesn't say.
    pub default_retry_after: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            default_retry_after: DEFAULT_RETRY_AFTER_SECS,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Reads the wait in seconds from a 429 response's headers.
    pub fn retry_after(&self, headers: &HeaderMap) -> u64 {
        parse_retry_after(headers).unwrap_or(self.default_retry_after)
    }

    /// Returns how long to sleep before retrying, or `None` once the budget
    /// is spent.
    ///
    /// # Arguments
    ///
    /// * `attempt` - Retries already made for this call (0 on the first failure)
    /// * `retry_after` - The wait in seconds
    pub fn delay_for(&self, attempt: usize, retry_after: u64) -> Option<Duration> {
        if attempt < self.max_retries {
            Some(Duration::from_millis(retry_after.saturating_mul(1000)))
        } else {
            None
        }
    }
}

/// Parses the `Retry-After` header as whole seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
