//! link-health main entry point
//!
//! This is the command-line interface for the link-health dead-link checker.

use clap::Parser;
use link_health::config::{load_config_file, CrawlConfig, FileConfig, Overrides};
use link_health::crawler::run_crawl;
use link_health::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// link-health: crawl a site and report broken links
///
/// Starting from a seed URL, link-health follows hyperlinks up to a maximum
/// depth and prints one line per fetched URL: `<url>\thealthy` or
/// `<url>\tdown\t<status>`.
#[derive(Parser, Debug)]
#[command(name = "link-health")]
#[command(version)]
#[command(about = "Crawl a site and report broken links", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(long, value_name = "URL")]
    url: String,

    /// Maximum number of link hops from the seed [default: 2]
    #[arg(long)]
    depth: Option<u32>,

    /// Number of concurrent workers [default: 4]
    #[arg(long)]
    threads: Option<usize>,

    /// Maximum concurrent requests per host [default: same as --threads]
    #[arg(long)]
    per_host: Option<usize>,

    /// User-Agent header [default: Simple_Link_Health_BOT]
    #[arg(long)]
    user_agent: Option<String>,

    /// Upper bound of the random delay before each request, in milliseconds [default: 1000]
    #[arg(long)]
    jitter_ms: Option<u64>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Optional TOML configuration file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress logs and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let file = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config_file(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?
        }
        None => FileConfig::default(),
    };

    let overrides = Overrides {
        user_agent: cli.user_agent,
        max_depth: cli.depth,
        parallelism: cli.threads,
        max_per_host: cli.per_host,
        jitter_ms: cli.jitter_ms,
        request_timeout_secs: cli.timeout_secs,
    };

    let config = match CrawlConfig::resolve(&cli.url, file, overrides) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            return Err(e.into());
        }
    };

    match run_crawl(config).await {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only link records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_health=info,warn"),
            1 => EnvFilter::new("link_health=debug,info"),
            2 => EnvFilter::new("link_health=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
