//! Keyword search over item names
//!
//! Queries are a list of keywords separated by `|` or `,`. A name matches
//! when it contains any keyword after both are normalized.

use crate::model::{EnrichedSite, Item};

/// Splits a query into unique, trimmed keywords
///
/// # Examples
///
/// ```
/// use rating_scan::search::parse_keywords;
///
/// assert_eq!(parse_keywords(" fog | flax, fog ,"), vec!["fog", "flax"]);
/// assert!(parse_keywords("  ").is_empty());
/// ```
pub fn parse_keywords(input: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for raw in input.split(['|', ',']) {
        let keyword = raw.trim();
        if !keyword.is_empty() && !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }

    keywords
}

/// Lowercases and folds `ё` into `е` so both spellings match
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase().replace('ё', "е")
}

/// Returns the names that contain any of `keys`
///
/// Empty keys or names yield nothing.
pub fn filter_names_by_keys<'a>(names: &[&'a str], keys: &[String]) -> Vec<&'a str> {
    if keys.is_empty() || names.is_empty() {
        return Vec::new();
    }

    let keys: Vec<String> = keys.iter().map(|k| normalize_text(k)).collect();

    names
        .iter()
        .copied()
        .filter(|name| {
            let name = normalize_text(name);
            keys.iter().any(|key| name.contains(key.as_str()))
        })
        .collect()
}

/// A site with the items that matched a search
#[derive(Debug, Clone)]
pub struct SiteMatch<'a> {
    pub site: &'a EnrichedSite,
    pub items: Vec<&'a Item>,
}

/// Finds the items of `site` whose names match `keys`
///
/// Placeholder items from the raw-pattern fallback carry no real name and
/// are never matched.
pub fn match_site<'a>(site: &'a EnrichedSite, keys: &[String]) -> Option<SiteMatch<'a>> {
    let named: Vec<&Item> = site.items.iter().filter(|i| !i.is_placeholder()).collect();
    let names: Vec<&str> = named.iter().map(|i| i.name.as_str()).collect();
    let matched = filter_names_by_keys(&names, keys);

    if matched.is_empty() {
        return None;
    }

    let items = named
        .into_iter()
        .filter(|item| matched.contains(&item.name.as_str()))
        .collect();

    Some(SiteMatch { site, items })
}
