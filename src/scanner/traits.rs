//! Scanner seams
//!
//! The orchestrator only talks to these traits, so each stage can be swapped
//! for a fake in tests or for another source layout.

use crate::model::{Item, Site};
use crate::ScanError;
use async_trait::async_trait;

/// Finds the ranked sites on one listing page
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    /// Extracts site candidates from a listing page
    ///
    /// Never fails: an unreachable page yields an empty list. Duplicates are
    /// allowed; the orchestrator deduplicates.
    async fn extract(&self, page: u32) -> Vec<Site>;
}

/// Retrieves the raw item fragment for a site
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Returns the fragment body for `site_id`, or an empty string when no
    /// fragment could be found
    ///
    /// The HTTP implementation converts every transport failure into an empty
    /// body. The `Result` lets other implementations report a failure that
    /// the orchestrator then isolates to that one site.
    async fn fetch_fragment(&self, site_id: &str) -> Result<String, ScanError>;
}

/// Turns a fragment body into items
pub trait ItemParser: Send + Sync {
    /// Parses `fragment` for `site_id`; pure, empty input gives empty output
    fn parse(&self, fragment: &str, site_id: &str) -> Vec<Item>;
}
