//! Output traits and types
//!
//! This module defines the renderer interface and the catalog data it
//! renders.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One unique site in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Review URL without its fragment
    pub url: String,

    pub site_id: String,

    pub name: String,

    /// Listing page the site was first seen on
    pub page: u32,

    /// Item names, in fragment order
    pub items: Vec<String>,
}

/// Totals for a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub pages_scanned: u32,

    /// Unique review URLs seen across all pages
    pub sites_checked: usize,

    /// Entries in the catalog
    pub sites_with_items: usize,

    pub total_items: usize,

    /// Keywords the catalog was filtered by, if any
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl CatalogSummary {
    /// Share of checked sites that made it into the catalog, as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.sites_checked == 0 {
            return 0.0;
        }
        (self.sites_with_items as f64 / self.sites_checked as f64) * 100.0
    }
}

/// Renders a catalog into a textual format
pub trait CatalogRenderer {
    /// Renders the full catalog
    fn render(&self, catalog: &super::Catalog) -> OutputResult<String>;
}
