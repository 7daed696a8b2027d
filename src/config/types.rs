use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent; the target rejects obvious bot agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

/// Main configuration structure for Rating-Scan
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Builds a configuration with default settings for the given target
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self {
            target: TargetConfig {
                base_url: base_url.into(),
                encoding: default_encoding(),
            },
            scan: ScanConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Base URL with any trailing slashes removed
    pub fn base_url(&self) -> &str {
        self.target.base_url.trim_end_matches('/')
    }
}

/// The ranking site being scanned
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Absolute root URL of the ranking site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// WHATWG label of the encoding the site serves
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

/// Scan orchestration settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of sites enriched at the same time within one page
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Number of listing pages to scan, starting at page 1
    #[serde(default = "default_pages")]
    pub pages: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            pages: default_pages(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(rename = "retry-limit", default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Backoff step; attempt N waits N times this long
    #[serde(rename = "retry-base-delay-ms", default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Backoff ceiling
    #[serde(rename = "retry-max-delay-ms", default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retry_limit: default_retry_limit(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_encoding() -> String {
    "windows-1251".to_string()
}

fn default_concurrency() -> usize {
    6
}

fn default_pages() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_retry_limit() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

fn default_retry_max_delay_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
