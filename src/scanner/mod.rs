//! Scan pipeline
//!
//! This module contains the core scanning logic, including:
//! - HTTP transport with retry and legacy-encoding decoding
//! - Review link extraction from listing pages
//! - Version-aware item fragment retrieval
//! - Layered item fragment parsing
//! - Bounded-concurrency page scan orchestration

mod coordinator;
mod fragment;
mod links;
mod retry;
mod source;
mod traits;
mod transport;

pub use coordinator::{dedupe_sites, PageScan, Scanner, DEFAULT_CONCURRENCY};
pub use fragment::{parse_fragment, FragmentParser, STRATEGIES};
pub use links::{extract_sites, HtmlLinkExtractor};
pub use retry::{RetryPolicy, RETRYABLE_STATUSES};
pub use source::{find_version_token, FragmentItemSource};
pub use traits::{ItemParser, ItemSource, LinkExtractor};
pub use transport::{build_http_client, Transport};

use crate::config::Config;
use crate::ScanError;

/// Scans the configured number of pages with the HTTP-backed pipeline
///
/// This is the main entry point for a run. It builds the transport and the
/// three stages from `config`, then scans pages `1..=config.scan.pages`.
///
/// # Returns
///
/// * `Ok(Vec<PageScan>)` - One entry per page, in page order
/// * `Err(ScanError)` - The HTTP client could not be built
pub async fn scan(config: &Config) -> Result<Vec<PageScan>, ScanError> {
    let scanner = Scanner::from_config(config)?;
    Ok(scanner.scan_pages(config.scan.pages).await)
}
