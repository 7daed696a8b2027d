//! Retry policy for the transport
//!
//! The policy is a plain value: how many retries, which failures qualify, and
//! how long to wait before each retry. The transport consults it after every
//! failed attempt; call sites never loop on their own.

use crate::config::HttpConfig;
use reqwest::StatusCode;
use std::time::Duration;

/// HTTP statuses worth retrying
///
/// Besides the usual overload/timeout codes this includes the CDN edge codes
/// the target's front proxy returns while the origin is restarting.
pub const RETRYABLE_STATUSES: &[u16] = &[408, 413, 429, 500, 502, 503, 504, 521, 522, 524];

/// Bounded linear-backoff retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay added per attempt
    pub base_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Builds the policy described by the HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            max_retries: config.retry_limit,
            base_delay: config.retry_base_delay(),
            max_delay: config.retry_max_delay(),
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total number of attempts, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Whether another attempt is allowed after `attempt` attempts have failed
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }

    /// Delay before retry number `attempt` (1-based), capped at `max_delay`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt).min(self.max_delay)
    }

    /// Returns true if a response with this status should be retried
    pub fn is_retryable_status(&self, status: StatusCode) -> bool {
        RETRYABLE_STATUSES.contains(&status.as_u16())
    }

    /// Returns true if a transport error is transient
    ///
    /// Timeouts, connection failures and requests that never reached the
    /// server qualify. Redirect and body decoding errors do not.
    pub fn is_retryable_error(&self, error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect() || error.is_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_linearly_then_caps() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay: Duration::from_millis(400),
            max_delay: Duration::from_millis(1_000),
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(400));
        assert_eq!(policy.delay_for(2), Duration::from_millis(800));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(9), Duration::from_millis(1_000));
    }

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));

        assert!(!RetryPolicy::none().allows_retry(1));
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();

        for code in [408, 413, 429, 500, 502, 503, 504, 521, 522, 524] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(policy.is_retryable_status(status), "{} should retry", code);
        }

        for code in [400, 401, 403, 404, 410, 501] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!policy.is_retryable_status(status), "{} should not retry", code);
        }
    }

    #[test]
    fn test_from_config() {
        let config = HttpConfig {
            retry_limit: 4,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 300,
            ..HttpConfig::default()
        };

        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay_for(5), Duration::from_millis(300));
    }
}
