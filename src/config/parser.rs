use crate::config::types::{CrawlConfig, FileConfig, Overrides};
use crate::config::validation::validate;
use crate::url::parse_seed;
use crate::ConfigError;
use std::path::Path;
use std::time::Duration;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully loaded file settings
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use link_health::config::load_config_file;
///
/// let file = load_config_file(Path::new("link-health.toml")).unwrap();
/// println!("Max depth: {:?}", file.max_depth);
/// ```
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: FileConfig = toml::from_str(&content)?;
    Ok(file)
}

impl CrawlConfig {
    /// Resolves the final configuration
    ///
    /// Precedence is defaults, then the file, then command-line overrides.
    /// The seed is validated first so that an invalid seed is always reported
    /// as such, whatever else is wrong.
    ///
    /// # Arguments
    ///
    /// * `seed` - Raw seed URL as typed by the user
    /// * `file` - Settings loaded from a config file (or `FileConfig::default()`)
    /// * `overrides` - Command-line values
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlConfig)` - Validated configuration
    /// * `Err(ConfigError)` - Invalid seed or knob value
    pub fn resolve(
        seed: &str,
        file: FileConfig,
        overrides: Overrides,
    ) -> Result<CrawlConfig, ConfigError> {
        let seed_url = parse_seed(seed).map_err(|source| ConfigError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;

        let mut config = CrawlConfig::new(seed_url);

        if let Some(user_agent) = overrides.user_agent.or(file.user_agent) {
            config.user_agent = user_agent;
        }
        if let Some(max_depth) = overrides.max_depth.or(file.max_depth) {
            config.max_depth = max_depth;
        }
        if let Some(parallelism) = overrides.parallelism.or(file.parallelism) {
            config.parallelism = parallelism;
        }

        // Per-host limit follows the worker count unless set explicitly
        config.max_per_host = overrides
            .max_per_host
            .or(file.max_per_host)
            .unwrap_or(config.parallelism);

        if let Some(jitter_ms) = overrides.jitter_ms.or(file.jitter_ms) {
            config.jitter = Duration::from_millis(jitter_ms);
        }
        if let Some(secs) = overrides
            .request_timeout_secs
            .or(file.request_timeout_secs)
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.connect_timeout_secs {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(max_redirects) = file.max_redirects {
            config.max_redirects = max_redirects;
        }
        if let Some(secs) = file.shutdown_grace_secs {
            config.shutdown_grace = Duration::from_secs(secs);
        }

        validate(&config)?;
        Ok(config)
    }
}
