//! Configuration module for Rating-Scan
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting except the target base URL has a default, so a one-line file
//! (or just `--base-url` on the command line) is enough to run a scan.
//!
//! # Example
//!
//! ```no_run
//! use rating_scan::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("rating-scan.toml")).unwrap();
//! println!("Scanning {} with concurrency {}", config.base_url(), config.scan.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ScanConfig, TargetConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_with_overrides, Overrides};

pub use validation::{validate, MAX_CONCURRENCY, MAX_PAGES};
