//! Line-oriented console reporter
//!
//! Link records go to stdout, one tab-separated line each, so they can be
//! piped into other tools. Advisory errors go to stderr.

use crate::output::traits::{LinkRecord, Reporter};

/// Placeholder printed in the status column when no response was received
const NO_STATUS: &str = "-";

/// Formats a record as a single output line (without trailing newline)
///
/// # Examples
///
/// ```
/// use link_health::output::{format_record, LinkRecord};
/// use url::Url;
///
/// let record = LinkRecord {
///     url: Url::parse("http://a.test/missing").unwrap(),
///     status_code: Some(404),
///     healthy: false,
/// };
/// assert_eq!(format_record(&record), "http://a.test/missing\tdown\t404");
/// ```
pub fn format_record(record: &LinkRecord) -> String {
    if record.healthy {
        return format!("{}\thealthy", record.url);
    }

    match record.status_code {
        Some(status) => format!("{}\tdown\t{}", record.url, status),
        None => format!("{}\tdown\t{}", record.url, NO_STATUS),
    }
}

/// Formats an advisory error line
pub fn format_error(message: &str) -> String {
    format!("Error: {}", message)
}

/// Reporter that prints records to stdout and errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, record: &LinkRecord) {
        println!("{}", format_record(record));
    }

    fn report_error(&self, message: &str) {
        eprintln!("{}", format_error(message));
    }
}
