//! HTML link extractor
//!
//! Produces the raw hyperlink targets of a document. Resolution and
//! filtering happen later in the URL normalizer.

use scraper::{Html, Selector};

/// Elements whose `href` denotes a followable hyperlink
const LINK_SELECTOR: &str = "a[href], area[href]";

/// Extracts raw link targets from an HTML document
///
/// Yields the `href` attribute of every `<a>` and `<area>` element, in
/// document order, exactly as written (possibly relative, possibly
/// malformed). Elements without an `href` are skipped; a body that is not
/// valid HTML still produces whatever links the parser could recover.
///
/// # Arguments
///
/// * `body` - The HTML content to scan
///
/// # Returns
///
/// The raw `href` values, duplicates included
///
/// # Example
///
/// ```
/// use link_health::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/ok">OK</a><a href="/missing">Gone</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/ok", "/missing"]);
/// ```
pub fn extract_links(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);

    let selector = match Selector::parse(LINK_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
