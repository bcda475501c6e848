use crate::UrlError;
use url::Url;

/// Query parameters stripped during canonicalization.
///
/// Any `utm_*` key is removed as well, so only the non-utm families need
/// to be listed here.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "dclid",
    "msclkid",
    "yclid",
    "ref",
    "referrer",
    "source",
    "campaign",
    "mc_cid",
    "mc_eid",
    "_ga",
    "_gid",
    "affiliate",
    "affiliatecode",
    "amp",
];

/// Canonicalizes a raw URL against a base URL.
///
/// The canonical form is the deduplication key used throughout the
/// engine: two inputs that resolve to the same scheme, host, path, and
/// filtered query produce byte-identical output, and canonicalizing an
/// already-canonical URL is a no-op.
///
/// # Canonicalization Steps
///
/// 1. Resolve `raw` against `base` (relative-to-absolute resolution)
/// 2. Reject non-HTTP(S) schemes and URLs without a host
/// 3. Remove the fragment (everything after `#`)
/// 4. Remove tracking query parameters (case-insensitive), preserving
///    the relative order of the survivors
/// 5. Remove a single trailing slash unless the path is exactly `/`
///
/// # Arguments
///
/// * `raw` - The URL to canonicalize, absolute or relative
/// * `base` - The page URL relative references resolve against
///
/// # Returns
///
/// * `Ok(Url)` - Canonical URL
/// * `Err(UrlError)` - Resolution failed or the result is not a crawlable URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkscout::url::canonicalize;
///
/// let base = Url::parse("https://example.com/blog").unwrap();
/// let url = canonicalize("/a?utm_source=x&id=5#frag", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/a?id=5");
/// ```
pub fn canonicalize(raw: &str, base: &Url) -> Result<Url, UrlError> {
    let mut url = base.join(raw.trim()).map_err(|e| UrlError::Resolve {
        raw: raw.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let filtered: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        if filtered.is_empty() {
            url.set_query(None);
        } else {
            let query = filtered
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        k.clone()
                    } else {
                        format!("{}={}", k, v)
                    }
                })
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

/// Canonicalizes an absolute URL string, such as a seed URL.
///
/// Equivalent to [`canonicalize`] with the URL as its own base; fails on
/// relative input.
pub fn canonicalize_str(raw: &str) -> Result<Url, UrlError> {
    let base = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(raw, &base)
}

/// Checks if a query parameter key is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog").unwrap()
    }

    #[test]
    fn test_relative_resolution() {
        let result = canonicalize("/page", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_relative_path_resolution() {
        let base = Url::parse("https://example.com/blog/").unwrap();
        let result = canonicalize("my-post", &base).unwrap();
        assert_eq!(result.as_str(), "https://example.com/blog/my-post");
    }

    #[test]
    fn test_absolute_input_ignores_base() {
        let result = canonicalize("https://other.com/x", &base()).unwrap();
        assert_eq!(result.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_remove_fragment() {
        let result = canonicalize("https://example.com/page#section", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = canonicalize("https://example.com/page/", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = canonicalize("https://example.com/", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_tracking_params() {
        let result =
            canonicalize("https://example.com/page?utm_source=twitter&fbclid=abc", &base())
                .unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_functional_params() {
        let result = canonicalize("https://example.com/a?utm_source=foo&id=5", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/a?id=5");
    }

    #[test]
    fn test_param_order_preserved() {
        let result = canonicalize("https://example.com/a?b=2&utm_medium=x&a=1", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/a?b=2&a=1");
    }

    #[test]
    fn test_tracking_params_case_insensitive() {
        let result = canonicalize("https://example.com/a?UTM_Source=x&FBCLID=y", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_custom_utm_param() {
        let result = canonicalize("https://example.com/a?utm_custom=v", &base()).unwrap();
        assert_eq!(result.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://example.com/a?utm_source=x&id=5#frag",
            "https://example.com/a/",
            "https://example.com/",
            "https://example.com/a?b=2&a=1",
        ];
        for input in inputs {
            let once = canonicalize(input, &base()).unwrap();
            let twice = canonicalize(once.as_str(), &base()).unwrap();
            assert_eq!(once.as_str(), twice.as_str(), "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_equal_after_removed_parts() {
        let a = canonicalize("https://example.com/a?utm_source=x", &base()).unwrap();
        let b = canonicalize("https://example.com/a#frag", &base()).unwrap();
        let c = canonicalize("https://example.com/a/", &base()).unwrap();
        assert_eq!(a.as_str(), b.as_str());
        assert_eq!(b.as_str(), c.as_str());
    }

    #[test]
    fn test_invalid_scheme() {
        let result = canonicalize("ftp://example.com/file", &base());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_mailto_rejected() {
        let result = canonicalize("mailto:someone@example.com", &base());
        assert!(result.is_err());
    }

    #[test]
    fn test_canonicalize_str_rejects_relative() {
        assert!(canonicalize_str("/just/a/path").is_err());
    }

    #[test]
    fn test_canonicalize_str_seed() {
        let result = canonicalize_str("https://example.com/blog/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/blog");
    }
}
