//! Markdown report generation
//!
//! Produces a human-readable report of a scan: run totals followed by a
//! table of the sites that have items.

use crate::output::traits::{CatalogRenderer, OutputResult};
use crate::output::Catalog;
use chrono::{DateTime, Utc};

/// Markdown renderer
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    generated_at: DateTime<Utc>,
}

impl MarkdownRenderer {
    /// Creates a renderer stamped with the current time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a renderer stamped with a fixed time
    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self { generated_at }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogRenderer for MarkdownRenderer {
    fn render(&self, catalog: &Catalog) -> OutputResult<String> {
        Ok(format_markdown_report(catalog, &self.generated_at))
    }
}

/// Formats a catalog as markdown
///
/// # Arguments
///
/// * `catalog` - The catalog to render
/// * `generated_at` - Timestamp written into the header
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(catalog: &Catalog, generated_at: &DateTime<Utc>) -> String {
    let summary = &catalog.summary;
    let mut md = String::new();

    md.push_str("# Rating-Scan Report\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !summary.keywords.is_empty() {
        md.push_str(&format!("- **Keywords**: {}\n", summary.keywords.join(", ")));
    }
    md.push_str(&format!("- **Pages Scanned**: {}\n", summary.pages_scanned));
    md.push_str(&format!("- **Sites Checked**: {}\n", summary.sites_checked));
    md.push_str(&format!(
        "- **Sites With Items**: {} ({:.1}%)\n",
        summary.sites_with_items,
        summary.hit_rate()
    ));
    md.push_str(&format!("- **Total Items**: {}\n\n", summary.total_items));

    if catalog.entries.is_empty() {
        md.push_str("No sites with items found.\n");
        return md;
    }

    md.push_str("## Sites\n\n");
    md.push_str("| # | Site | Page | Items |\n");
    md.push_str("|---|------|------|-------|\n");
    for (index, entry) in catalog.entries.iter().enumerate() {
        md.push_str(&format!(
            "| {} | [{}]({}) | {} | {} |\n",
            index + 1,
            escape_cell(&entry.name),
            entry.url,
            entry.page,
            escape_cell(&entry.items.join(", "))
        ));
    }
    md.push('\n');

    md
}

/// Escapes characters that would break a markdown table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
