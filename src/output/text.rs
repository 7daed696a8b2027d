//! Plain text and JSON renderers

use crate::output::traits::{CatalogRenderer, OutputResult};
use crate::output::Catalog;

/// Numbered one-line-per-site listing
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl CatalogRenderer for TextRenderer {
    fn render(&self, catalog: &Catalog) -> OutputResult<String> {
        Ok(format_text_listing(catalog))
    }
}

/// Pretty-printed JSON of the whole catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl CatalogRenderer for JsonRenderer {
    fn render(&self, catalog: &Catalog) -> OutputResult<String> {
        let mut json = serde_json::to_string_pretty(catalog)?;
        json.push('\n');
        Ok(json)
    }
}

/// Formats a catalog as `N. url — item, item` lines
///
/// An empty catalog renders a single explanatory line.
pub fn format_text_listing(catalog: &Catalog) -> String {
    if catalog.entries.is_empty() {
        return "No sites with items found.\n".to_string();
    }

    let mut out = String::new();
    for (index, entry) in catalog.entries.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} — {}\n",
            index + 1,
            entry.url,
            entry.items.join(", ")
        ));
    }
    out
}
