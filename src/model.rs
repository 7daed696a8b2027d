//! Records produced by the scan pipeline
//!
//! A [`Site`] is what the link extractor finds on a listing page. Enrichment
//! never mutates it: [`Site::with_items`] builds a separate [`EnrichedSite`]
//! that carries the parsed [`Item`]s next to a copy of the extracted record.

use serde::Serialize;

/// Name given to items recovered only from the raw script-call scan
///
/// These carry no real label; they only signal that items exist.
pub const PLACEHOLDER_ITEM_NAME: &str = "Item";

/// A ranked site discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    /// Identifier taken from the review-page path
    pub id: String,

    /// Best-effort display name
    pub name: String,

    /// Normalized absolute URL of the review page
    pub url: String,
}

impl Site {
    /// Creates a site record
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }

    /// Name used when no text could be recovered for a site
    pub fn fallback_name(id: &str) -> String {
        format!("Site {}", id)
    }

    /// Builds the enriched record for this site, leaving `self` untouched
    pub fn with_items(&self, items: Vec<Item>) -> EnrichedSite {
        EnrichedSite {
            site: self.clone(),
            has_items: !items.is_empty(),
            items,
        }
    }

    /// Enriched record for a site whose items could not be retrieved
    pub fn without_items(&self) -> EnrichedSite {
        self.with_items(Vec::new())
    }
}

/// A single item listed in a site's fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// `{site_id}-{ordinal}`; unique within one parse result only
    pub id: String,

    /// Human-readable label, never empty
    pub name: String,

    /// Extra descriptive text, when the extraction strategy exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Set only for items recovered by the raw script-call scan
    #[serde(skip)]
    placeholder: bool,
}

impl Item {
    /// Creates an item with the synthesized `{site_id}-{ordinal}` identifier
    pub fn new(site_id: &str, ordinal: usize, name: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", site_id, ordinal),
            name: name.into(),
            description: None,
            placeholder: false,
        }
    }

    /// Creates a count-only item that stands for an unnamed entry
    pub fn placeholder(site_id: &str, ordinal: usize) -> Self {
        Self {
            placeholder: true,
            ..Self::new(site_id, ordinal, PLACEHOLDER_ITEM_NAME)
        }
    }

    /// Attaches a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true for count-only placeholder items
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// A site after item enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedSite {
    #[serde(flatten)]
    pub site: Site,

    /// True iff `items` is non-empty
    #[serde(rename = "hasItems")]
    pub has_items: bool,

    /// Parsed items, empty when none were found
    pub items: Vec<Item>,
}

impl EnrichedSite {
    pub fn id(&self) -> &str {
        &self.site.id
    }

    pub fn url(&self) -> &str {
        &self.site.url
    }

    /// Names of all items, in fragment order
    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }
}
