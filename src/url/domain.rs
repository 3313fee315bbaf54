use url::Url;

/// Returns the key used to group requests by host
///
/// The key is the lowercase host followed by the effective port, so
/// `http://example.com/` and `http://example.com:80/a` share a key while
/// `http://example.com:8080/` does not.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_health::url::host_key;
///
/// let url = Url::parse("https://Example.com/path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com:443".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port_or_known_default() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
