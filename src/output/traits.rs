//! Reporter trait and the record types it receives
//!
//! This module defines the fetch outcome produced once per crawl target, the
//! health classification applied to it, and the sink interface that receives
//! the resulting link records.

use url::Url;

/// Lowest status code considered healthy
pub const HEALTHY_MIN_STATUS: u16 = 200;

/// Highest status code considered healthy
pub const HEALTHY_MAX_STATUS: u16 = 299;

/// Outcome of fetching a single crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The URL that was fetched
    pub url: Url,

    /// HTTP status code, absent when the fetch failed before a response
    pub status_code: Option<u16>,

    /// Failure reason, if the fetch did not complete
    pub error: Option<String>,
}

impl FetchOutcome {
    /// Outcome of a fetch that produced a response
    pub fn responded(url: Url, status_code: u16) -> Self {
        Self {
            url,
            status_code: Some(status_code),
            error: None,
        }
    }

    /// Outcome of a fetch that failed without a usable response
    pub fn failed(url: Url, reason: impl Into<String>) -> Self {
        Self {
            url,
            status_code: None,
            error: Some(reason.into()),
        }
    }
}

/// Classifies a fetch outcome
///
/// Healthy iff there is no error and the status code lies in 200..=299.
///
/// # Examples
///
/// ```
/// use link_health::output::{classify, FetchOutcome};
/// use url::Url;
///
/// let url = Url::parse("http://a.test/").unwrap();
/// assert!(classify(&FetchOutcome::responded(url.clone(), 204)));
/// assert!(!classify(&FetchOutcome::responded(url.clone(), 404)));
/// assert!(!classify(&FetchOutcome::failed(url, "timeout")));
/// ```
pub fn classify(outcome: &FetchOutcome) -> bool {
    if outcome.error.is_some() {
        return false;
    }

    matches!(
        outcome.status_code,
        Some(status) if (HEALTHY_MIN_STATUS..=HEALTHY_MAX_STATUS).contains(&status)
    )
}

/// The externally visible result for one crawled URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// The fetched URL
    pub url: Url,

    /// HTTP status code, if a response was received
    pub status_code: Option<u16>,

    /// Health verdict
    pub healthy: bool,
}

impl From<&FetchOutcome> for LinkRecord {
    fn from(outcome: &FetchOutcome) -> Self {
        Self {
            url: outcome.url.clone(),
            status_code: outcome.status_code,
            healthy: classify(outcome),
        }
    }
}

/// Sink for crawl results
///
/// Implementations are shared by every worker and must tolerate concurrent
/// calls. Records arrive in completion order, not traversal order.
pub trait Reporter: Send + Sync {
    /// Receives one record per completed fetch
    fn report(&self, record: &LinkRecord);

    /// Receives advisory messages: failed requests and infrastructure problems
    fn report_error(&self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for std::sync::Arc<R> {
    fn report(&self, record: &LinkRecord) {
        (**self).report(record)
    }

    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://a.test/page").unwrap()
    }

    #[test]
    fn test_success_range_is_healthy() {
        for status in [200, 201, 204, 299] {
            assert!(
                classify(&FetchOutcome::responded(url(), status)),
                "{} should be healthy",
                status
            );
        }
    }

    #[test]
    fn test_other_statuses_are_unhealthy() {
        for status in [100, 199, 300, 301, 404, 429, 500, 503] {
            assert!(
                !classify(&FetchOutcome::responded(url(), status)),
                "{} should be unhealthy",
                status
            );
        }
    }

    #[test]
    fn test_transport_failure_is_unhealthy() {
        let outcome = FetchOutcome::failed(url(), "connection refused");
        assert_eq!(outcome.status_code, None);
        assert!(!classify(&outcome));
    }

    #[test]
    fn test_error_overrides_status() {
        let outcome = FetchOutcome {
            url: url(),
            status_code: Some(200),
            error: Some("body truncated".to_string()),
        };
        assert!(!classify(&outcome));
    }

    #[test]
    fn test_record_from_outcome() {
        let record = LinkRecord::from(&FetchOutcome::responded(url(), 404));
        assert_eq!(record.url, url());
        assert_eq!(record.status_code, Some(404));
        assert!(!record.healthy);
    }
}
