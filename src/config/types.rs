use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Identifying agent string sent with every request
pub const DEFAULT_USER_AGENT: &str = "Simple_Link_Health_BOT";
/// Maximum number of link hops followed from the seed
pub const DEFAULT_MAX_DEPTH: u32 = 2;
/// Number of concurrent fetch workers
pub const DEFAULT_PARALLELISM: usize = 4;
/// Upper bound of the random delay inserted before each request
pub const DEFAULT_JITTER_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// Fully resolved crawl configuration
///
/// Immutable for the duration of a crawl. Built from defaults, an optional
/// TOML file and command-line overrides by [`CrawlConfig::resolve`].
///
/// [`CrawlConfig::resolve`]: crate::config::CrawlConfig::resolve
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Validated seed URL (depth 0)
    pub seed_url: Url,

    /// Maximum depth to crawl from the seed
    pub max_depth: u32,

    /// Number of concurrent fetch workers
    pub parallelism: usize,

    /// Maximum concurrent fetches against a single host
    pub max_per_host: usize,

    /// Upper bound for the random delay before each request
    pub jitter: Duration,

    /// User-Agent header value
    pub user_agent: String,

    /// Total time allowed for one request, body included
    pub request_timeout: Duration,

    /// Time allowed to establish a connection
    pub connect_timeout: Duration,

    /// Redirect hops followed before the fetch is considered failed
    pub max_redirects: usize,

    /// How long in-flight fetches may run after a stop request
    pub shutdown_grace: Duration,
}

impl CrawlConfig {
    /// Creates a configuration for `seed_url` with every knob at its default
    pub fn new(seed_url: Url) -> Self {
        Self {
            seed_url,
            max_depth: DEFAULT_MAX_DEPTH,
            parallelism: DEFAULT_PARALLELISM,
            max_per_host: DEFAULT_PARALLELISM,
            jitter: Duration::from_millis(DEFAULT_JITTER_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
        }
    }
}

/// Settings read from an optional TOML configuration file
///
/// Every key is optional; absent keys fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub user_agent: Option<String>,
    pub max_depth: Option<u32>,
    pub parallelism: Option<usize>,
    pub max_per_host: Option<usize>,
    pub jitter_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub max_redirects: Option<usize>,
    pub shutdown_grace_secs: Option<u64>,
}

/// Values given on the command line; they win over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub user_agent: Option<String>,
    pub max_depth: Option<u32>,
    pub parallelism: Option<usize>,
    pub max_per_host: Option<usize>,
    pub jitter_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}
