//! Review link extraction from listing pages
//!
//! A listing page links each ranked site to its review page
//! (`/comm/{id}/...`). Those anchors are the only reliable handle on a site:
//! the surrounding markup changes between page layouts, so the display name
//! is recovered with a best-effort fallback chain.

use crate::model::Site;
use crate::scanner::traits::LinkExtractor;
use crate::scanner::transport::Transport;
use crate::url::{extract_site_id, normalize_review_url, page_url, REVIEW_LINK_MARKER};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Row- or card-like elements that hold one ranked entry
const CONTAINER_SELECTOR: &str = "tr, .trow, .site, .block, div, li";

/// Elements inside a container that usually carry the site's name
const NAME_SELECTOR: &str = r#"b, strong, .title, a[href^="http"]"#;

/// Link extractor backed by the live listing pages
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    base_url: String,
    transport: Transport,
}

impl HtmlLinkExtractor {
    /// Creates an extractor for the site rooted at `base_url`
    pub fn new(base_url: impl Into<String>, transport: Transport) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }
}

#[async_trait]
impl LinkExtractor for HtmlLinkExtractor {
    async fn extract(&self, page: u32) -> Vec<Site> {
        let url = page_url(&self.base_url, page);
        tracing::debug!("Fetching listing page {}: {}", page, url);

        let html = match self.transport.fetch_decoded(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to fetch listing page {}: {}", url, e);
                return Vec::new();
            }
        };

        let base = match Url::parse(&format!("{}/", self.base_url)) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Invalid base URL {}: {}", self.base_url, e);
                return Vec::new();
            }
        };

        let sites = extract_sites(&html, &base);
        tracing::debug!("Listing page {} yielded {} review link(s)", page, sites.len());
        sites
    }
}

/// Extracts one [`Site`] per review anchor in a listing page
///
/// # Extraction Rules
///
/// - Only `<a href>` elements whose target contains `/comm/` are considered
/// - The URL is resolved against `base_url` and normalized (fragment dropped,
///   duplicate slashes collapsed)
/// - Anchors without a numeric site identifier are skipped
/// - Duplicates are kept; the same site often has several anchors
///
/// # Name Resolution
///
/// 1. The anchor's own text
/// 2. The first bold, strong, `.title` or outbound link text inside the
///    nearest row/card ancestor
/// 3. `"Site {id}"`
///
/// # Example
///
/// ```
/// use rating_scan::scanner::extract_sites;
/// use url::Url;
///
/// let html = r#"<a href="/comm/42/1.htm">The Answer</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let sites = extract_sites(html, &base);
/// assert_eq!(sites[0].id, "42");
/// assert_eq!(sites[0].name, "The Answer");
/// ```
pub fn extract_sites(html: &str, base_url: &Url) -> Vec<Site> {
    let document = Html::parse_document(html);
    let mut sites = Vec::new();

    let Ok(anchor_selector) = Selector::parse(&format!(r#"a[href*="{}"]"#, REVIEW_LINK_MARKER))
    else {
        return sites;
    };

    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let url = match normalize_review_url(href, base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Skipping review link {}: {}", href, e);
                continue;
            }
        };

        let Some(id) = extract_site_id(&url) else {
            continue;
        };

        let name = resolve_name(anchor).unwrap_or_else(|| Site::fallback_name(&id));
        sites.push(Site { id, name, url });
    }

    sites
}

/// Finds a display name for the site behind `anchor`
fn resolve_name(anchor: ElementRef) -> Option<String> {
    let own_text = element_text(anchor);
    if !own_text.is_empty() {
        return Some(own_text);
    }

    let container_selector = Selector::parse(CONTAINER_SELECTOR).ok()?;
    let name_selector = Selector::parse(NAME_SELECTOR).ok()?;

    let container = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| container_selector.matches(element))?;

    let text = element_text(container.select(&name_selector).next()?);
    (!text.is_empty()).then_some(text)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_extracts_absolute_links_and_ids() {
        let html = r##"
            <html><body>
              <a href="/comm/27190/1.htm">Reviews</a>
              <a href="/comm/27190/1.htm#addcomm">Reviews (dup)</a>
              <a href="/comm/11/1.htm">Reviews 11</a>
            </body></html>
        "##;

        let sites = extract_sites(html, &base_url());
        let ids: Vec<&str> = sites.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["27190", "27190", "11"]);

        for site in &sites {
            assert!(!site.url.contains('#'));
        }
        assert_eq!(sites[0].url, "https://example.com/comm/27190/1.htm");
        assert_eq!(sites[0].url, sites[1].url);
    }

    #[test]
    fn test_skips_non_review_links() {
        let html = r#"
            <a href="/p2.html">Next</a>
            <a href="https://elsewhere.org/">Elsewhere</a>
            <a href="/comm/">Reviews index</a>
            <a href="/comm/abc/1.htm">Bad id</a>
        "#;

        assert!(extract_sites(html, &base_url()).is_empty());
    }

    #[test]
    fn test_name_from_anchor_text() {
        let html = r#"<table><tr><td><b>Row title</b></td><td><a href="/comm/5/1.htm"> Dragon Keep </a></td></tr></table>"#;
        let sites = extract_sites(html, &base_url());
        assert_eq!(sites[0].name, "Dragon Keep");
    }

    #[test]
    fn test_name_from_sibling_in_row() {
        let html = r#"
            <table>
              <tr>
                <td><b>Dragon Keep</b></td>
                <td><a href="/comm/5/1.htm"><img src="/i/comments.gif"></a></td>
              </tr>
            </table>
        "#;

        let sites = extract_sites(html, &base_url());
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "Dragon Keep");
    }

    #[test]
    fn test_name_from_outbound_link_in_card() {
        let html = r#"
            <div class="site">
              <a href="http://dragonkeep.example/">Dragon Keep</a>
              <a href="/comm/5/1.htm"></a>
            </div>
        "#;

        let sites = extract_sites(html, &base_url());
        assert_eq!(sites[0].name, "Dragon Keep");
    }

    #[test]
    fn test_fallback_name_when_nothing_recoverable() {
        let html = r#"<div><a href="/comm/77/1.htm"><img src="/x.gif"></a></div>"#;
        let sites = extract_sites(html, &base_url());
        assert_eq!(sites[0].name, "Site 77");
    }

    #[test]
    fn test_collapses_duplicate_slashes() {
        let html = r#"<a href="https://example.com//comm//9/1.htm">Nine</a>"#;
        let sites = extract_sites(html, &base_url());
        assert_eq!(sites[0].url, "https://example.com/comm/9/1.htm");
    }
}
