//! Output module for crawl results
//!
//! This module handles:
//! - Classifying fetch outcomes as healthy or down
//! - The reporter interface that receives link records and advisory errors
//! - Console and in-memory reporters
//! - Crawl statistics and the final summary

mod console;
mod memory;
pub mod stats;
mod traits;

pub use console::{format_error, format_record, ConsoleReporter};
pub use memory::CollectingReporter;
pub use stats::{print_summary, CrawlStatistics, CrawlSummary};
pub use traits::{
    classify, FetchOutcome, LinkRecord, Reporter, HEALTHY_MAX_STATUS, HEALTHY_MIN_STATUS,
};
