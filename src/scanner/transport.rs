//! HTTP transport
//!
//! This module performs every request the scanner makes:
//! - Building the reqwest client with browser-like headers
//! - Retrying transient failures according to a [`RetryPolicy`]
//! - Decoding the legacy single-byte body into text
//!
//! Callers only ever see decoded text or a [`ScanError`].

use crate::config::Config;
use crate::scanner::retry::RetryPolicy;
use crate::ScanError;
use encoding_rs::Encoding;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::Duration;

const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "ru,en;q=0.9";

/// Outcome of a single failed attempt
struct AttemptFailure {
    error: ScanError,
    retryable: bool,
}

/// Encoding-aware HTTP GET with retries
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    encoding: &'static Encoding,
    policy: RetryPolicy,
    referer: Option<String>,
}

impl Transport {
    /// Builds a transport from the scan configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Transport)` - Client built with the configured timeout and agent
    /// * `Err(ScanError)` - Unknown encoding label or client build failure
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let encoding = Encoding::for_label(config.target.encoding.as_bytes()).ok_or_else(|| {
            crate::ConfigError::Validation(format!(
                "Unknown encoding label '{}'",
                config.target.encoding
            ))
        })?;

        let client = build_http_client(&config.http.user_agent, config.http.timeout())?;

        Ok(Self {
            client,
            encoding,
            policy: RetryPolicy::from_config(&config.http),
            referer: None,
        })
    }

    /// Returns a transport that sends `referer` with every request
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Replaces the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url` and returns the decoded body
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Decode and return |
    /// | 408, 413, 429, 5xx, CDN edge codes | Retry with linear backoff |
    /// | Timeout, connect/DNS failure, reset | Retry with linear backoff |
    /// | Any other status | Fail immediately with `Status` |
    /// | Undecodable body | Fail immediately with `Decode` |
    ///
    /// Once the policy's retries are spent the last failure is returned.
    pub async fn fetch_decoded(&self, url: &str) -> Result<String, ScanError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let failure = match self.attempt(url).await {
                Ok(bytes) => return self.decode(url, &bytes),
                Err(failure) => failure,
            };

            if !failure.retryable || !self.policy.allows_retry(attempt) {
                tracing::debug!(
                    "Giving up on {} after {} attempt(s): {}",
                    url,
                    attempt,
                    failure.error
                );
                return Err(failure.error);
            }

            let delay = self.policy.delay_for(attempt);
            tracing::debug!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                self.policy.max_attempts(),
                url,
                failure.error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Sends one GET and reads the raw body
    async fn attempt(&self, url: &str) -> Result<Vec<u8>, AttemptFailure> {
        let mut request = self.client.get(url);
        if let Some(referer) = &self.referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(|source| AttemptFailure {
            retryable: self.policy.is_retryable_error(&source),
            error: ScanError::Network {
                url: url.to_string(),
                source,
            },
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure {
                retryable: self.policy.is_retryable_status(status),
                error: ScanError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                },
            });
        }

        let bytes = response.bytes().await.map_err(|source| AttemptFailure {
            retryable: self.policy.is_retryable_error(&source),
            error: ScanError::Network {
                url: url.to_string(),
                source,
            },
        })?;

        Ok(bytes.to_vec())
    }

    /// Decodes a response body with the target's encoding
    fn decode(&self, url: &str, bytes: &[u8]) -> Result<String, ScanError> {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(bytes);
        if had_errors {
            return Err(ScanError::Decode {
                url: url.to_string(),
                encoding: self.encoding.name(),
            });
        }
        Ok(text.into_owned())
    }
}

/// Builds an HTTP client that looks like a desktop browser
///
/// `accept-encoding` is left to reqwest so that gzip and brotli bodies are
/// decompressed transparently.
///
/// # Arguments
///
/// * `user_agent` - The user agent string to send
/// * `timeout` - Per-request timeout
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
    );

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
