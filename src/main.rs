//! Rating-Scan main entry point
//!
//! This is the command-line interface for the Rating-Scan catalog extractor.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rating_scan::config::{load_config_with_overrides, Config, Overrides};
use rating_scan::output::{
    write_catalog, Catalog, CatalogRenderer, JsonRenderer, MarkdownRenderer, TextRenderer,
};
use rating_scan::scanner::scan;
use rating_scan::search::parse_keywords;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rating-Scan: a catalog extractor for a paginated site ranking
///
/// Rating-Scan walks the listing pages of a ranking website, finds every
/// ranked site and lists the items each one currently offers. Results can be
/// filtered by item keywords.
#[derive(Parser, Debug)]
#[command(name = "rating-scan")]
#[command(version)]
#[command(about = "Catalog extractor for a paginated site ranking", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root URL of the ranking site (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Number of listing pages to scan
    #[arg(short, long)]
    pages: Option<u32>,

    /// Maximum number of sites enriched at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Retries after a failed request
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Only report items matching these keywords (separated by `|` or `,`)
    #[arg(short, long, value_name = "KEYWORDS")]
    search: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show what would be scanned without scanning
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Collects the flags that take precedence over the config file
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            concurrency: self.concurrency,
            pages: self.pages,
            timeout_secs: self.timeout,
            retry_limit: self.retries,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl OutputFormat {
    fn renderer(self) -> Box<dyn CatalogRenderer> {
        match self {
            Self::Text => Box::new(TextRenderer),
            Self::Markdown => Box::new(MarkdownRenderer::new()),
            Self::Json => Box::new(JsonRenderer),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = cli.overrides();

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_with_overrides(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    let keywords = cli.search.as_deref().map(parse_keywords).unwrap_or_default();
    if cli.search.is_some() && keywords.is_empty() {
        anyhow::bail!("--search needs at least one non-empty keyword");
    }

    if cli.dry_run {
        handle_dry_run(&config, &keywords);
        return Ok(());
    }

    handle_scan(&cli, &config, &keywords).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rating_scan=info,warn"),
            1 => EnvFilter::new("rating_scan=debug,info"),
            2 => EnvFilter::new("rating_scan=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so a report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, keywords: &[String]) {
    println!("=== Rating-Scan Dry Run ===\n");

    println!("Target:");
    println!("  Base URL: {}", config.base_url());
    println!("  Encoding: {}", config.target.encoding);

    println!("\nScan:");
    println!("  Pages: {}", config.scan.pages);
    println!("  Concurrency: {}", config.scan.concurrency);

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Retry limit: {}", config.http.retry_limit);
    println!(
        "  Retry delay: {}ms step, {}ms max",
        config.http.retry_base_delay_ms, config.http.retry_max_delay_ms
    );
    println!("  User agent: {}", config.http.user_agent);

    if !keywords.is_empty() {
        println!("\nSearch keywords ({}):", keywords.len());
        for keyword in keywords {
            println!("  - {}", keyword);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scan {} listing page(s)", config.scan.pages);
}

/// Handles the main scan operation
async fn handle_scan(cli: &Cli, config: &Config, keywords: &[String]) -> anyhow::Result<()> {
    tracing::info!(
        "Scanning {} page(s) of {} (concurrency {})",
        config.scan.pages,
        config.base_url(),
        config.scan.concurrency
    );

    let pages = scan(config).await.context("Scan failed")?;

    let catalog = if keywords.is_empty() {
        Catalog::from_pages(&pages)
    } else {
        Catalog::search(&pages, keywords)
    };

    tracing::info!(
        "Scan complete: {} site(s) checked, {} with items, {} item(s)",
        catalog.summary.sites_checked,
        catalog.summary.sites_with_items,
        catalog.summary.total_items
    );

    let renderer = cli.format.renderer();
    write_catalog(renderer.as_ref(), &catalog, cli.output.as_deref())
        .context("Failed to write report")?;

    if let Some(path) = &cli.output {
        tracing::info!("Report written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "rating-scan",
            "--base-url",
            "https://example.com",
            "--pages",
            "3",
            "--concurrency",
            "4",
            "--timeout",
            "30",
            "--retries",
            "1",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(overrides.pages, Some(3));
        assert_eq!(overrides.concurrency, Some(4));
        assert_eq!(overrides.timeout_secs, Some(30));
        assert_eq!(overrides.retry_limit, Some(1));
    }

    #[test]
    fn test_flags_default_to_no_overrides() {
        let cli = Cli::try_parse_from(["rating-scan", "--config", "scan.toml"]).unwrap();
        let overrides = cli.overrides();

        assert!(overrides.base_url.is_none());
        assert!(overrides.timeout_secs.is_none());
        assert!(overrides.retry_limit.is_none());
        assert!(matches!(cli.format, OutputFormat::Text));
    }
}
