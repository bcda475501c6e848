use url::Url;

/// Returns the host of a URL, lowercased, with any `www.` prefix removed.
///
/// This is the host form used for same-origin comparison throughout the
/// engine; ports are intentionally not part of the comparison.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkscout::url::origin_host;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(origin_host(&url), Some("example.com".to_string()));
/// ```
pub fn origin_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => host,
        }
    })
}

/// Checks whether two URLs share an origin.
///
/// Hosts are compared case-insensitively and a `www.` prefix is ignored,
/// so `https://www.example.com` and `https://example.com` compare equal.
/// URLs without a host never match anything.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    match (origin_host(a), origin_host(b)) {
        (Some(ha), Some(hb)) => ha == hb,
        _ => false,
    }
}
