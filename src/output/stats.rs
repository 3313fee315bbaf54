//! Crawl statistics
//!
//! Counters are updated by every worker while the crawl runs and turned into
//! a [`CrawlSummary`] once the pool has drained.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by the worker pool
#[derive(Debug)]
pub struct CrawlStatistics {
    started_at: DateTime<Utc>,
    fetched: AtomicU64,
    healthy: AtomicU64,
    down: AtomicU64,
    failed: AtomicU64,
    links_discovered: AtomicU64,
    links_enqueued: AtomicU64,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            fetched: AtomicU64::new(0),
            healthy: AtomicU64::new(0),
            down: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            links_discovered: AtomicU64::new(0),
            links_enqueued: AtomicU64::new(0),
        }
    }

    /// Records one completed fetch
    ///
    /// `transport_failure` is true when no response was received at all.
    pub fn record_fetch(&self, healthy: bool, transport_failure: bool) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
        if healthy {
            self.healthy.fetch_add(1, Ordering::Relaxed);
        } else {
            self.down.fetch_add(1, Ordering::Relaxed);
        }
        if transport_failure {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records links proposed by the extractor and how many were new
    pub fn record_links(&self, discovered: u64, enqueued: u64) {
        self.links_discovered.fetch_add(discovered, Ordering::Relaxed);
        self.links_enqueued.fetch_add(enqueued, Ordering::Relaxed);
    }

    /// Number of fetches completed so far
    pub fn fetched(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a summary
    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            started_at: self.started_at,
            finished_at: Utc::now(),
            fetched: self.fetched.load(Ordering::Relaxed),
            healthy: self.healthy.load(Ordering::Relaxed),
            down: self.down.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
        }
    }
}

/// Final numbers for a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Fetches completed (one link record each)
    pub fetched: u64,

    /// Records classified healthy
    pub healthy: u64,

    /// Records classified down, transport failures included
    pub down: u64,

    /// Fetches that produced no response
    pub failed: u64,

    /// Valid links proposed by the extractor
    pub links_discovered: u64,

    /// Links accepted by the frontier as new
    pub links_enqueued: u64,
}

impl CrawlSummary {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Prints a summary to stderr so stdout stays reserved for link records
pub fn print_summary(summary: &CrawlSummary) {
    let seconds = summary.duration().num_milliseconds() as f64 / 1000.0;

    eprintln!("=== Crawl Summary ===");
    eprintln!("  Started: {}", summary.started_at.to_rfc3339());
    eprintln!("  Duration: {:.1}s", seconds);
    eprintln!("  Links checked: {}", summary.fetched);
    eprintln!("  Healthy: {}", summary.healthy);
    eprintln!(
        "  Down: {} ({} without response)",
        summary.down, summary.failed
    );
    eprintln!(
        "  Links discovered: {} ({} new)",
        summary.links_discovered, summary.links_enqueued
    );
}
