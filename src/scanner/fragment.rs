//! Item fragment parsing
//!
//! The item endpoint returns quasi-XML whose shape differs between sites and
//! over time. Parsing is an ordered chain of strategies; the first one that
//! yields at least one item wins and the rest never run:
//!
//! 1. `<alt>` labels nested directly under `<items>` containers
//! 2. `<alt>` labels anywhere in the fragment
//! 3. Anchors pointing at known item action endpoints
//! 4. A raw scan for `item_get(...)` script calls, producing placeholders
//!
//! Fragments are parsed as tag soup, so unbalanced or HTML-flavoured bodies
//! still go through the structural strategies. XML empty elements such as
//! `<alt/>` are expanded into open/close pairs first; an HTML parser would
//! otherwise leave them open and fold the following siblings into them.

use crate::model::Item;
use crate::scanner::traits::ItemParser;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Action endpoints whose anchors stand for a single item
const ACTION_ANCHOR_SELECTOR: &str =
    r#"a[href*="m.cgi?a="], a[href*="_item.cgi"], a[href*="item_get"]"#;

/// HTML void elements; a trailing slash on these is already understood
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// A fragment prepared for the strategy chain
pub struct Fragment<'a> {
    raw: &'a str,
    document: Html,
    site_id: &'a str,
}

impl<'a> Fragment<'a> {
    pub fn new(raw: &'a str, site_id: &'a str) -> Self {
        Self {
            raw,
            document: Html::parse_fragment(&expand_empty_elements(raw)),
            site_id,
        }
    }
}

/// One parsing strategy; `None` means "nothing found, try the next one"
pub type Strategy = fn(&Fragment) -> Option<Vec<Item>>;

/// The strategy chain, in the order it is tried
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("structured", structured_alt),
    ("loose", loose_alt),
    ("anchors", action_anchors),
    ("raw", raw_item_calls),
];

/// Parser for the item fragment endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentParser;

impl FragmentParser {
    pub fn new() -> Self {
        Self
    }
}

impl ItemParser for FragmentParser {
    fn parse(&self, fragment: &str, site_id: &str) -> Vec<Item> {
        parse_fragment(fragment, site_id)
    }
}

/// Parses a fragment body into items
///
/// Pure and infallible: an empty or unrecognizable body yields an empty list.
///
/// # Example
///
/// ```
/// use rating_scan::scanner::parse_fragment;
///
/// let items = parse_fragment("<item><items><alt>Bottle of beer</alt></items></item>", "26742");
/// assert_eq!(items[0].id, "26742-1");
/// assert_eq!(items[0].name, "Bottle of beer");
/// ```
pub fn parse_fragment(raw: &str, site_id: &str) -> Vec<Item> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let fragment = Fragment::new(raw, site_id);

    for (name, strategy) in STRATEGIES {
        if let Some(items) = strategy(&fragment) {
            tracing::trace!(
                "Site {}: {} item(s) via {} strategy",
                site_id,
                items.len(),
                name
            );
            return items;
        }
    }

    Vec::new()
}

/// `<alt>` elements that are direct children of `<items>`
fn structured_alt(fragment: &Fragment) -> Option<Vec<Item>> {
    select_labels(fragment, "items > alt")
}

/// `<alt>` elements at any depth
fn loose_alt(fragment: &Fragment) -> Option<Vec<Item>> {
    select_labels(fragment, "alt")
}

/// Anchors to item action endpoints; the title attribute beats the text
fn action_anchors(fragment: &Fragment) -> Option<Vec<Item>> {
    let selector = Selector::parse(ACTION_ANCHOR_SELECTOR).ok()?;

    let items = fragment
        .document
        .select(&selector)
        .enumerate()
        .filter_map(|(index, anchor)| {
            let text = element_text(anchor);
            let title = anchor
                .value()
                .attr("title")
                .map(str::trim)
                .filter(|title| !title.is_empty());

            let item = match title {
                Some(title) => {
                    let item = Item::new(fragment.site_id, index + 1, title);
                    if text.is_empty() || text == title {
                        item
                    } else {
                        item.with_description(text)
                    }
                }
                None if !text.is_empty() => Item::new(fragment.site_id, index + 1, text),
                None => return None,
            };
            Some(item)
        })
        .collect::<Vec<_>>();

    non_empty(items)
}

/// Count-only fallback over the raw body
fn raw_item_calls(fragment: &Fragment) -> Option<Vec<Item>> {
    static ITEM_CALL: OnceLock<Regex> = OnceLock::new();
    let re = ITEM_CALL
        .get_or_init(|| Regex::new(r"item_get\([^)]*\)").expect("item call regex is valid"));

    let items = re
        .find_iter(fragment.raw)
        .enumerate()
        .map(|(index, _)| Item::placeholder(fragment.site_id, index + 1))
        .collect::<Vec<_>>();

    non_empty(items)
}

/// Collects the trimmed text of every match as an item
///
/// Ordinals count every matched element, so an empty label leaves a gap.
fn select_labels(fragment: &Fragment, selector: &str) -> Option<Vec<Item>> {
    let selector = Selector::parse(selector).ok()?;

    let items = fragment
        .document
        .select(&selector)
        .enumerate()
        .filter_map(|(index, element)| {
            let name = element_text(element);
            (!name.is_empty()).then(|| Item::new(fragment.site_id, index + 1, name))
        })
        .collect::<Vec<_>>();

    non_empty(items)
}

/// Rewrites `<tag .../>` as `<tag ...></tag>` for every non-void element
fn expand_empty_elements(raw: &str) -> Cow<'_, str> {
    static EMPTY_ELEMENT: OnceLock<Regex> = OnceLock::new();
    let re = EMPTY_ELEMENT.get_or_init(|| {
        Regex::new(r"<([A-Za-z][\w:.-]*)([^<>]*?)\s*/>").expect("empty element regex is valid")
    });

    re.replace_all(raw, |caps: &Captures| {
        let tag = &caps[1];
        if VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) {
            caps[0].to_string()
        } else {
            format!("<{}{}></{}>", tag, &caps[2], tag)
        }
    })
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(items: Vec<Item>) -> Option<Vec<Item>> {
    (!items.is_empty()).then_some(items)
}
