//! Item fragment retrieval
//!
//! The item endpoint of each site is tied to a build number that changes
//! independently per site. The only reliable way to learn it is to read the
//! `ver` parameter off the item script the review page currently references,
//! then try the qualified endpoint before the bare one.

use crate::scanner::traits::ItemSource;
use crate::scanner::transport::Transport;
use crate::url::{fragment_urls, review_url};
use crate::ScanError;
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Script references that load the item bundle, in preference order
const ITEM_SCRIPT_SELECTORS: &[&str] = &[
    r#"script[src*="/js/item_"]"#,
    r#"script[src*="/js/_item"]"#,
];

/// Item source backed by the live review pages and fragment endpoint
#[derive(Debug, Clone)]
pub struct FragmentItemSource {
    base_url: String,
    transport: Transport,
}

impl FragmentItemSource {
    /// Creates a source for the site rooted at `base_url`
    ///
    /// The fragment endpoint rejects requests without a referer, so the
    /// transport is configured to send the site root as one.
    pub fn new(base_url: impl Into<String>, transport: Transport) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let transport = transport.with_referer(format!("{}/", base_url));
        Self {
            base_url,
            transport,
        }
    }

    /// Fetches the fragment, returning an empty string when nothing is found
    pub async fn list(&self, site_id: &str) -> String {
        let review = review_url(&self.base_url, site_id);
        let html = match self.transport.fetch_decoded(&review).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to fetch review page {}: {}", review, e);
                return String::new();
            }
        };

        let version = find_version_token(&html);
        tracing::debug!("Site {} item version token: {:?}", site_id, version);

        for candidate in fragment_urls(&self.base_url, site_id, version.as_deref()) {
            match self.transport.fetch_decoded(&candidate).await {
                Ok(body) if !body.trim().is_empty() => return body,
                Ok(_) => tracing::debug!("Empty item fragment from {}", candidate),
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch item fragment for site {} from {}: {}",
                        site_id,
                        candidate,
                        e
                    );
                }
            }
        }

        String::new()
    }
}

#[async_trait]
impl ItemSource for FragmentItemSource {
    async fn fetch_fragment(&self, site_id: &str) -> Result<String, ScanError> {
        Ok(self.list(site_id).await)
    }
}

/// Reads the `ver` token from the item script referenced by a review page
///
/// # Example
///
/// ```
/// use rating_scan::scanner::find_version_token;
///
/// let html = r#"<script src="/js/item_123.js?ver=2040"></script>"#;
/// assert_eq!(find_version_token(html), Some("2040".to_string()));
/// ```
pub fn find_version_token(html: &str) -> Option<String> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let re =
        VERSION.get_or_init(|| Regex::new(r"ver=(\d+)").expect("version regex is valid"));

    let document = Html::parse_document(html);

    let src = ITEM_SCRIPT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .find_map(|script| script.value().attr("src"))
                .map(str::to_string)
        })?;

    re.captures(&src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
