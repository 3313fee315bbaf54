use crate::UrlError;
use url::{ParseError, Url};

/// Schemes the crawler is able to fetch
const FETCHABLE_SCHEMES: &[&str] = &["http", "https"];

/// Normalizes a candidate link found on `base` into a canonical absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject an empty candidate
/// 2. Resolve the candidate against the base page URL
/// 3. Reject anything that is not http/https or has no host
/// 4. Drop the fragment (it never denotes a distinct fetchable resource)
///
/// Host lowercasing, default-port elision, dot-segment removal and the
/// empty-path-to-`/` rewrite come from the WHATWG parser itself. Query strings
/// are kept as-is since they address different resources.
///
/// # Arguments
///
/// * `candidate` - The raw, possibly relative, link target
/// * `base` - The URL of the page the link was found on
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The candidate is malformed or not fetchable
///
/// # Examples
///
/// ```
/// use link_health::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/docs/").unwrap();
/// let url = normalize("../ok#top", &base).unwrap();
/// assert_eq!(url.as_str(), "http://a.test/ok");
/// ```
pub fn normalize(candidate: &str, base: &Url) -> Result<Url, UrlError> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = base.join(candidate).map_err(map_parse_error)?;
    canonicalize(url)
}

/// Parses and validates the seed URL
///
/// Applies the same rules as [`normalize`] to an absolute URL with no base.
/// A relative string is reported as a missing scheme.
///
/// # Examples
///
/// ```
/// use link_health::url::parse_seed;
///
/// assert!(parse_seed("https://example.com").is_ok());
/// assert!(parse_seed("example.com").is_err());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(seed).map_err(map_parse_error)?;
    canonicalize(url)
}

fn canonicalize(mut url: Url) -> Result<Url, UrlError> {
    if !FETCHABLE_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);
    Ok(url)
}

fn map_parse_error(err: ParseError) -> UrlError {
    match err {
        ParseError::RelativeUrlWithoutBase => UrlError::MissingScheme,
        ParseError::EmptyHost => UrlError::MissingHost,
        other => UrlError::Parse(other.to_string()),
    }
}
