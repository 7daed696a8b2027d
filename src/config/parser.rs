use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub concurrency: Option<usize>,
    pub pages: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub retry_limit: Option<u32>,
}

impl Overrides {
    /// Applies every set value to `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.scan.concurrency = concurrency;
        }
        if let Some(pages) = self.pages {
            config.scan.pages = pages;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.http.timeout_secs = timeout_secs;
        }
        if let Some(retry_limit) = self.retry_limit {
            config.http.retry_limit = retry_limit;
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_overrides(Some(path), &Overrides::default())
}

/// Builds the effective configuration from an optional file plus overrides
///
/// Without a file the base URL must come from `overrides`. Validation runs
/// after the overrides are applied, so a bad flag is reported the same way as
/// a bad file value.
pub fn load_config_with_overrides(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        }
        None => {
            let base_url = overrides.base_url.clone().ok_or_else(|| {
                ConfigError::Validation(
                    "base URL is required when no config file is given".to_string(),
                )
            })?;
            Config::from_base_url(base_url)
        }
    };

    overrides.apply(&mut config);
    validate(&config)?;

    Ok(config)
}
