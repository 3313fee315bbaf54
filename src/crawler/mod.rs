//! Crawler module for fetching pages and checking their health
//!
//! This module contains the core crawling logic, including:
//! - The frontier (visited set and pending queue)
//! - HTTP fetching with timeouts and redirect limits
//! - HTML link extraction
//! - Per-host concurrency limiting
//! - The worker pool that coordinates all of the above

mod coordinator;
mod fetcher;
mod frontier;
mod limiter;
mod parser;

pub use coordinator::{Coordinator, StopHandle};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{CrawlTarget, Frontier, Lease, VisitedSet};
pub use limiter::{HostLimiter, LimiterError};
pub use parser::extract_links;

use crate::config::CrawlConfig;
use crate::output::{ConsoleReporter, CrawlSummary};
use crate::LinkHealthError;

/// Runs a complete crawl with the HTTP fetcher and console reporter
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier
/// 3. Stop cooperatively on Ctrl-C
/// 4. Run the worker pool until the frontier drains
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished (links may still be down)
/// * `Err(LinkHealthError)` - Setup failed before any request was made
///
/// # Example
///
/// ```no_run
/// use link_health::config::{CrawlConfig, FileConfig, Overrides};
/// use link_health::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::resolve(
///     "https://example.com/",
///     FileConfig::default(),
///     Overrides::default(),
/// )?;
/// let summary = run_crawl(config).await?;
/// println!("{} links checked", summary.fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlSummary, LinkHealthError> {
    let fetcher = HttpFetcher::new(&config)?;
    let coordinator = Coordinator::new(config, fetcher, ConsoleReporter::new())?;

    let stop = coordinator.stop_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight requests");
            stop.stop();
        }
    });

    let summary = coordinator.run().await;
    interrupt.abort();

    Ok(summary)
}
