use crate::output::traits::{LinkRecord, Reporter};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Reporter that keeps every record and error in memory
///
/// Useful for embedding the crawler in another program or asserting on a
/// crawl's results in tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    records: Mutex<Vec<LinkRecord>>,
    errors: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in completion order
    pub fn records(&self) -> Vec<LinkRecord> {
        lock(&self.records).clone()
    }

    /// Error messages received so far
    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    /// Finds the record for a URL string
    pub fn record_for(&self, url: &str) -> Option<LinkRecord> {
        lock(&self.records)
            .iter()
            .find(|record| record.url.as_str() == url)
            .cloned()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, record: &LinkRecord) {
        lock(&self.records).push(record.clone());
    }

    fn report_error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
