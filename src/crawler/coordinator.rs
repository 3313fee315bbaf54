//! Crawler coordinator - worker pool and per-target processing
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Seeding the frontier with the configured start URL
//! - Running a fixed pool of workers that drain the frontier
//! - Per-host concurrency limits that never park a worker on a busy host
//! - Request jitter
//! - Classifying and reporting each fetch, then following its links
//! - Cooperative stop with a bounded grace period

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::limiter::HostLimiter;
use crate::crawler::parser::extract_links;
use crate::output::{CrawlStatistics, CrawlSummary, FetchOutcome, LinkRecord, Reporter};
use crate::url::{host_key, normalize};
use crate::{ConfigError, LinkHealthError};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinSet;

/// Per-host permit held across one fetch; `None` for hosts without a key
type HostSlot = Option<OwnedSemaphorePermit>;

/// Shared state for every worker of one crawl
struct Shared<F, R> {
    config: CrawlConfig,
    frontier: Arc<Frontier>,
    limiter: HostLimiter,
    fetcher: F,
    reporter: R,
    stats: CrawlStatistics,
}

/// Handle used to request a cooperative stop of a running crawl
#[derive(Debug, Clone)]
pub struct StopHandle {
    frontier: Arc<Frontier>,
}

impl StopHandle {
    /// Stops handing out new targets; in-flight fetches get the grace period
    pub fn stop(&self) {
        self.frontier.stop();
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F, R> {
    shared: Arc<Shared<F, R>>,
}

impl<F, R> Coordinator<F, R>
where
    F: Fetcher,
    R: Reporter + 'static,
{
    /// Creates a new coordinator and seeds its frontier
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `fetcher` - Transport used for every request
    /// * `reporter` - Sink for link records and advisory errors
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(LinkHealthError)` - Invalid configuration or limiter setup
    pub fn new(config: CrawlConfig, fetcher: F, reporter: R) -> Result<Self, LinkHealthError> {
        validate(&config)?;

        let limiter = HostLimiter::new(config.max_per_host)
            .map_err(|e| ConfigError::Validation(format!("rate limiter: {}", e)))?;

        let frontier = Arc::new(Frontier::new(config.max_depth));
        frontier.enqueue(CrawlTarget::new(config.seed_url.clone(), 0));

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                frontier,
                limiter,
                fetcher,
                reporter,
                stats: CrawlStatistics::new(),
            }),
        })
    }

    /// Returns a handle that can stop the crawl from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            frontier: Arc::clone(&self.shared.frontier),
        }
    }

    /// The frontier driving this crawl
    pub fn frontier(&self) -> Arc<Frontier> {
        Arc::clone(&self.shared.frontier)
    }

    /// Runs the worker pool until the frontier drains or a stop completes
    ///
    /// After a stop request, in-flight fetches are given
    /// `config.shutdown_grace` to finish and are aborted afterwards.
    pub async fn run(self) -> CrawlSummary {
        let config = &self.shared.config;
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers, {} per host)",
            config.seed_url,
            config.max_depth,
            config.parallelism,
            config.max_per_host
        );

        let mut workers = JoinSet::new();
        for id in 0..config.parallelism {
            let shared = Arc::clone(&self.shared);
            workers.spawn(async move { shared.worker(id).await });
        }

        let grace = config.shutdown_grace;
        let graceful = {
            let finished = join_workers(&mut workers, &self.shared.reporter);
            tokio::pin!(finished);

            tokio::select! {
                _ = &mut finished => true,
                _ = self.shared.frontier.wait_stopped() => {
                    tracing::info!(
                        "Stop requested, waiting up to {:?} for in-flight fetches",
                        grace
                    );
                    tokio::time::timeout(grace, &mut finished).await.is_ok()
                }
            }
        };

        if !graceful {
            tracing::warn!("Abandoning in-flight fetches after {:?}", grace);
            workers.abort_all();
            while workers.join_next().await.is_some() {}
        }

        let summary = self.shared.stats.summary();
        tracing::info!(
            "Crawl completed: {} links checked ({} healthy, {} down) in {}ms",
            summary.fetched,
            summary.healthy,
            summary.down,
            summary.duration().num_milliseconds()
        );
        summary
    }
}

/// Waits for every worker, surfacing panics on the error channel
async fn join_workers<R: Reporter>(workers: &mut JoinSet<()>, reporter: &R) {
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                reporter.report_error(&format!("Worker task failed: {}", e));
            }
        }
    }
}

impl<F, R> Shared<F, R>
where
    F: Fetcher,
    R: Reporter,
{
    async fn worker(&self, id: usize) {
        tracing::debug!("Worker {} started", id);
        while let Some((lease, slot)) = self.frontier.dequeue_with(|t| self.reserve(t)).await {
            self.visit(lease.target(), slot).await;
        }
        tracing::debug!("Worker {} finished", id);
    }

    /// Claims a host slot for `target` without waiting
    ///
    /// The outer `None` means the host is saturated and the frontier should
    /// offer the next target instead.
    fn reserve(&self, target: &CrawlTarget) -> Option<HostSlot> {
        match host_key(target.url()) {
            Some(host) => self.limiter.try_acquire(&host).map(Some),
            None => Some(None),
        }
    }

    /// Processes a single target
    ///
    /// This method:
    /// 1. Sleeps a random jitter while holding the host slot
    /// 2. Fetches the URL
    /// 3. Releases the slot and wakes workers waiting on it
    /// 4. Classifies and reports the outcome
    /// 5. Enqueues the page's links one level deeper
    async fn visit(&self, target: &CrawlTarget, slot: HostSlot) {
        let url = target.url();

        let delay = jitter_delay(self.config.jitter);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        tracing::debug!("Fetching {} (depth {})", url, target.depth());
        let result = self.fetcher.fetch(url).await;
        drop(slot);
        self.frontier.wake();

        match result {
            Ok(page) => {
                let outcome = FetchOutcome::responded(url.clone(), page.status_code);
                self.publish(&outcome);

                if target.depth() < self.config.max_depth && page.is_html() {
                    self.expand(target, &page.body);
                }
            }
            Err(e) => {
                let mut reason = e.to_string();
                if reason.trim().is_empty() {
                    reason = "Unknown".to_string();
                }

                let outcome = FetchOutcome::failed(url.clone(), reason.as_str());
                self.publish(&outcome);
                self.reporter
                    .report_error(&format!("Request to {} failed. Reason: {}", url, reason));
            }
        }
    }

    fn publish(&self, outcome: &FetchOutcome) {
        let record = LinkRecord::from(outcome);
        self.stats
            .record_fetch(record.healthy, outcome.status_code.is_none());
        self.reporter.report(&record);
    }

    /// Extracts links from a fetched body and enqueues the new ones
    fn expand(&self, target: &CrawlTarget, body: &str) {
        let next_depth = target.depth() + 1;
        let mut discovered = 0;
        let mut enqueued = 0;

        for href in extract_links(body) {
            match normalize(&href, target.url()) {
                Ok(link) => {
                    discovered += 1;
                    if self.frontier.enqueue(CrawlTarget::new(link, next_depth)) {
                        enqueued += 1;
                    }
                }
                Err(e) => tracing::trace!("Skipping link {:?} on {}: {}", href, target.url(), e),
            }
        }

        tracing::debug!(
            "{}: {} links, {} new",
            target.url(),
            discovered,
            enqueued
        );
        self.stats.record_links(discovered, enqueued);
    }
}

/// Picks a random delay in `[0, max]`, at millisecond granularity
fn jitter_delay(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}
