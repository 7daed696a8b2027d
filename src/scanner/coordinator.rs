//! Scan coordinator - page scan orchestration
//!
//! This module ties the pipeline together:
//! - Extracting review links for a listing page
//! - Deduplicating sites by identifier
//! - Enriching every site with its items under a concurrency gate
//! - Isolating per-site failures so one bad site never sinks a page

use crate::config::{Config, MAX_CONCURRENCY};
use crate::model::{EnrichedSite, Site};
use crate::scanner::fragment::FragmentParser;
use crate::scanner::links::HtmlLinkExtractor;
use crate::scanner::source::FragmentItemSource;
use crate::scanner::traits::{ItemParser, ItemSource, LinkExtractor};
use crate::scanner::transport::Transport;
use crate::ScanError;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of sites enriched at the same time
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Result of scanning one listing page
#[derive(Debug, Clone)]
pub struct PageScan {
    pub page: u32,
    pub sites: Vec<EnrichedSite>,
}

/// Page scanner
///
/// Stateless between calls: every [`Scanner::scan_page`] call gets its own
/// admission gate, so concurrent page scans do not share slots.
#[derive(Clone)]
pub struct Scanner {
    links: Arc<dyn LinkExtractor>,
    source: Arc<dyn ItemSource>,
    parser: Arc<dyn ItemParser>,
    concurrency: usize,
}

impl Scanner {
    /// Creates a scanner from its three stages
    pub fn new(
        links: Arc<dyn LinkExtractor>,
        source: Arc<dyn ItemSource>,
        parser: Arc<dyn ItemParser>,
    ) -> Self {
        Self {
            links,
            source,
            parser,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Builds the HTTP-backed scanner described by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Scanner)` - Scanner sharing one HTTP client across all stages
    /// * `Err(ScanError)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, ScanError> {
        let transport = Transport::new(config)?;
        let base_url = config.base_url();

        let links = HtmlLinkExtractor::new(base_url, transport.clone());
        let source = FragmentItemSource::new(base_url, transport);

        Ok(Self::new(
            Arc::new(links),
            Arc::new(source),
            Arc::new(FragmentParser::new()),
        )
        .with_concurrency(config.scan.concurrency))
    }

    /// Sets the per-page concurrency limit, clamped to `1..=MAX_CONCURRENCY`
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scans one listing page and enriches every unique site on it
    ///
    /// The result follows the order in which sites first appear on the page,
    /// whatever order their enrichments finish in. A page that cannot be
    /// fetched yields an empty list.
    pub async fn scan_page(&self, page: u32) -> Vec<EnrichedSite> {
        let candidates = self.links.extract(page).await;
        let candidate_count = candidates.len();
        let unique = dedupe_sites(candidates);

        tracing::debug!(
            "Page {}: {} review link(s), {} unique site(s)",
            page,
            candidate_count,
            unique.len()
        );

        let gate = Semaphore::new(self.concurrency);
        let tasks = unique.iter().map(|site| {
            let gate = &gate;
            async move {
                // The gate is never closed, so acquisition only fails if it is dropped.
                let _permit = gate.acquire().await.ok();
                self.enrich_guarded(site).await
            }
        });

        let enriched = join_all(tasks).await;

        tracing::info!(
            "Page {}: {} site(s), {} with items",
            page,
            enriched.len(),
            enriched.iter().filter(|s| s.has_items).count()
        );

        enriched
    }

    /// Enriches a single site with its items
    ///
    /// Same semantics as one element of [`Scanner::scan_page`]: failures
    /// degrade to a site without items.
    pub async fn scan_one_site(&self, site: &Site) -> EnrichedSite {
        self.enrich_guarded(site).await
    }

    /// Scans pages `1..=pages` concurrently, returning results in page order
    pub async fn scan_pages(&self, pages: u32) -> Vec<PageScan> {
        let tasks = (1..=pages).map(|page| async move {
            PageScan {
                page,
                sites: self.scan_page(page).await,
            }
        });

        join_all(tasks).await
    }

    /// Fetches and parses the items of one site
    async fn enrich(&self, site: &Site) -> Result<EnrichedSite, ScanError> {
        let fragment = self.source.fetch_fragment(&site.id).await?;
        let items = self.parser.parse(&fragment, &site.id);
        Ok(site.with_items(items))
    }

    /// Runs [`Scanner::enrich`] and turns any error or panic into an empty result
    async fn enrich_guarded(&self, site: &Site) -> EnrichedSite {
        match AssertUnwindSafe(self.enrich(site)).catch_unwind().await {
            Ok(Ok(enriched)) => enriched,
            Ok(Err(e)) => {
                tracing::warn!("Enrichment of site {} failed: {}", site.id, e);
                site.without_items()
            }
            Err(panic) => {
                tracing::warn!(
                    "Enrichment of site {} panicked: {}",
                    site.id,
                    panic_message(panic.as_ref())
                );
                site.without_items()
            }
        }
    }
}

/// Keeps the first site for every identifier, preserving order
pub fn dedupe_sites(sites: Vec<Site>) -> Vec<Site> {
    let mut seen = HashSet::new();
    sites
        .into_iter()
        .filter(|site| seen.insert(site.id.clone()))
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
