//! Output module for turning scan results into reports
//!
//! This module handles:
//! - Folding per-page scan results into a catalog of unique sites
//! - Filtering the catalog by item keywords
//! - Rendering it as plain text, markdown, or JSON

mod markdown;
mod text;
mod traits;

pub use markdown::{format_markdown_report, MarkdownRenderer};
pub use text::{format_text_listing, JsonRenderer, TextRenderer};
pub use traits::{CatalogEntry, CatalogRenderer, CatalogSummary, OutputError, OutputResult};

use crate::scanner::PageScan;
use crate::search::match_site;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Unique sites with items, across all scanned pages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub summary: CatalogSummary,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog of every site that has items
    ///
    /// Sites are keyed by review URL without its fragment. The first
    /// occurrence that has items wins, so a site that came back empty on one
    /// page can still be filled from a later one.
    pub fn from_pages(pages: &[PageScan]) -> Self {
        Self::collect(pages, &[], |site| {
            Some(site.items.iter().map(|item| item.name.clone()).collect())
        })
    }

    /// Builds a catalog of the sites whose item names match `keywords`
    ///
    /// Only the matching item names are kept for each entry.
    pub fn search(pages: &[PageScan], keywords: &[String]) -> Self {
        Self::collect(pages, keywords, |site| {
            match_site(site, keywords)
                .map(|found| found.items.iter().map(|item| item.name.clone()).collect())
        })
    }

    fn collect<F>(pages: &[PageScan], keywords: &[String], select: F) -> Self
    where
        F: Fn(&crate::model::EnrichedSite) -> Option<Vec<String>>,
    {
        let mut checked = HashSet::new();
        let mut listed = HashSet::new();
        let mut entries = Vec::new();

        for page in pages {
            for site in &page.sites {
                let url = strip_fragment(site.url());
                checked.insert(url.to_string());
                if listed.contains(url) {
                    continue;
                }

                let Some(items) = select(site) else {
                    continue;
                };
                if items.is_empty() {
                    continue;
                }

                listed.insert(url.to_string());
                entries.push(CatalogEntry {
                    url: url.to_string(),
                    site_id: site.id().to_string(),
                    name: site.site.name.clone(),
                    page: page.page,
                    items,
                });
            }
        }

        let summary = CatalogSummary {
            pages_scanned: pages.len() as u32,
            sites_checked: checked.len(),
            sites_with_items: entries.len(),
            total_items: entries.iter().map(|e| e.items.len()).sum(),
            keywords: keywords.to_vec(),
        };

        Self { summary, entries }
    }
}

/// Renders `catalog` and writes it to `path`, or to stdout when `path` is `None`
pub fn write_catalog(
    renderer: &dyn CatalogRenderer,
    catalog: &Catalog,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = renderer.render(catalog)?;

    match path {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn strip_fragment(url: &str) -> &str {
    url.split('#').next().unwrap_or(url)
}
