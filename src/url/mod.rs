//! Target-site addressing for Rating-Scan
//!
//! The ranking site has no API, so every endpoint is a URL shape we build by
//! hand: listing pages, per-site review pages, and the item fragment endpoint
//! that may or may not be qualified with a version token.

mod normalize;

use regex::Regex;
use std::sync::OnceLock;

pub use normalize::{collapse_slashes, normalize_review_url};

/// Path marker shared by every review-page link
pub const REVIEW_LINK_MARKER: &str = "/comm/";

/// Returns the URL of a listing page
///
/// Page 1 is the site root; later pages live at `/p{N}.html`.
///
/// # Examples
///
/// ```
/// use rating_scan::url::page_url;
///
/// assert_eq!(page_url("https://example.com", 1), "https://example.com/");
/// assert_eq!(page_url("https://example.com", 4), "https://example.com/p4.html");
/// ```
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        format!("{}/", base_url)
    } else {
        format!("{}/p{}.html", base_url, page)
    }
}

/// Returns the first review page of a site
pub fn review_url(base_url: &str, site_id: &str) -> String {
    format!("{}{}{}/1.htm", base_url, REVIEW_LINK_MARKER, site_id)
}

/// Returns the item fragment endpoints to try for a site, in order
///
/// With a version token the qualified endpoint comes first and the
/// unqualified one is kept as a fallback; without a token only the
/// unqualified endpoint is returned.
pub fn fragment_urls(base_url: &str, site_id: &str, version: Option<&str>) -> Vec<String> {
    let unqualified = format!(
        "{}/cgi-bin/js/_item.cgi?act=list&site={}&page=1",
        base_url, site_id
    );

    match version {
        Some(ver) => vec![
            format!(
                "{}/cgi-bin/js/_item.cgi?act=list&ver={}&site={}&page=1",
                base_url, ver, site_id
            ),
            unqualified,
        ],
        None => vec![unqualified],
    }
}

/// Extracts the site identifier from a review-page URL
///
/// The identifier is the numeric segment right after `/comm/`. Returns `None`
/// when the URL does not have that shape.
pub fn extract_site_id(url: &str) -> Option<String> {
    static SITE_ID: OnceLock<Regex> = OnceLock::new();
    let re =
        SITE_ID.get_or_init(|| Regex::new(r"/comm/(\d+)/").expect("site id regex is valid"));

    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
