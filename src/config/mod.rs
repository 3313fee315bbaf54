//! Configuration module for link-health
//!
//! This module resolves the crawl configuration from built-in defaults, an
//! optional TOML file and command-line overrides, then validates it.
//!
//! # Example
//!
//! ```
//! use link_health::config::{CrawlConfig, FileConfig, Overrides};
//!
//! let config = CrawlConfig::resolve(
//!     "https://example.com/",
//!     FileConfig::default(),
//!     Overrides::default(),
//! )
//! .unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, FileConfig, Overrides, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_JITTER_MS,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_REDIRECTS, DEFAULT_PARALLELISM, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SHUTDOWN_GRACE_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::load_config_file;
pub use validation::validate;
