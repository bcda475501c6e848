//! Bundle-heuristic extraction strategy
//!
//! Single-page applications often encode navigable routes only inside
//! compiled JavaScript: object literals with `slug`/`path` fields,
//! router-push call arguments, or framework-specific embedded data.
//! This strategy runs a fixed battery of pattern rules over script
//! payloads, validates the candidates it finds, and joins survivors
//! with the page's own path prefix and origin.

use crate::extract::embedded::scan_embedded;
use crate::extract::{accept_page_link, is_asset_path, ExtractionResult, StrategyKind};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Payloads shorter than this carry no route data worth scanning
const MIN_PAYLOAD_LEN: usize = 100;

/// Minimum cleaned-slug length accepted by validation
const MIN_SLUG_LEN: usize = 5;

static OBJECT_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[{,]\s*["'](?:slug|path|href|url|permalink)["']\s*:\s*["']([^"']{2,80})["']"#)
        .expect("hardcoded regex pattern is valid")
});

static NAV_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:router\.push\(|navigate\(|window\.location\.href\s*=)\s*["']([^"']{2,80})["']"#)
        .expect("hardcoded regex pattern is valid")
});

static ARRAY_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\}\s*,\s*\{[^{}]*?["']slug["']\s*:\s*["']([^"']{3,60})["']"#)
        .expect("hardcoded regex pattern is valid")
});

/// Runs the full bundle strategy over script payloads plus the page's
/// own markup (for framework-embedded data blocks).
///
/// # Arguments
///
/// * `payloads` - Script bodies to scan (inline and fetched external)
/// * `html` - The page markup, scanned for embedded serialized data
/// * `page_url` - The page the scripts belong to; its path becomes the
///   route prefix candidates are joined under
pub fn extract_bundle(payloads: &[String], html: Option<&str>, page_url: &Url) -> ExtractionResult {
    let mut result = extract_from_scripts(payloads, page_url);

    if let Some(html) = html {
        let embedded = scan_embedded(html, page_url);

        // Fragments that failed to parse as JSON still go through the
        // raw pattern battery.
        if !embedded.unparsed.is_empty() {
            let fallback = extract_from_scripts(&embedded.unparsed, page_url);
            result.links.extend(fallback.links);
        }

        if !embedded.links.is_empty() {
            result
                .notes
                .push(format!("{} links from embedded data", embedded.links.len()));
        }
        result.notes.extend(embedded.notes);
        result.links.extend(embedded.links);
    }

    result.success = !result.links.is_empty();
    result
}

/// Applies the pattern battery to raw script payloads.
///
/// Zero candidates is not an error: the strategy reports an empty,
/// unsuccessful result and the aggregator moves on.
pub fn extract_from_scripts(payloads: &[String], page_url: &Url) -> ExtractionResult {
    let prefix = route_prefix(page_url);
    let literal_re = literal_route_regex(&prefix);

    let mut slugs: BTreeSet<String> = BTreeSet::new();
    let mut paths: BTreeSet<String> = BTreeSet::new();
    let mut scanned = 0usize;

    for payload in payloads {
        let content = payload.as_str();
        if content.len() < MIN_PAYLOAD_LEN {
            continue;
        }
        scanned += 1;

        // Rule (a): literal route-prefixed strings
        for capture in literal_re.captures_iter(content) {
            if let Some(slug) = validate_slug(&capture[1]) {
                slugs.insert(slug);
            }
        }

        // Rule (b): object literals keyed by slug/path/href/url/permalink
        for capture in OBJECT_KEY_RE.captures_iter(content) {
            classify_candidate(&capture[1], &mut slugs, &mut paths);
        }

        // Rule (c): client-side navigation call arguments
        for capture in NAV_CALL_RE.captures_iter(content) {
            classify_candidate(&capture[1], &mut slugs, &mut paths);
        }

        // Rule (d): arrays of post-like objects
        for capture in ARRAY_OBJECT_RE.captures_iter(content) {
            if let Some(slug) = validate_slug(&capture[1]) {
                slugs.insert(slug);
            }
        }
    }

    let mut result = ExtractionResult::empty(StrategyKind::Bundle);
    result.notes.push(format!(
        "{} payloads scanned, {} slug candidates, {} path candidates",
        scanned,
        slugs.len(),
        paths.len()
    ));

    for slug in &slugs {
        let joined = if prefix.is_empty() {
            format!("/{}", slug)
        } else {
            format!("{}/{}", prefix, slug)
        };
        if let Some(link) = accept_page_link(&joined, page_url) {
            result.links.insert(link);
        }
    }

    for path in &paths {
        if let Some(link) = accept_page_link(path, page_url) {
            result.links.insert(link);
        }
    }

    result.success = !result.links.is_empty();
    result
}

/// The page's own path with any trailing slash removed; the prefix new
/// route slugs are appended under
fn route_prefix(page_url: &Url) -> String {
    page_url.path().trim_end_matches('/').to_string()
}

/// Rule (a) compiled for one page's route prefix
fn literal_route_regex(prefix: &str) -> Regex {
    let pattern = format!(r#"["']{}/([a-z0-9-]{{3,50}})["']"#, regex::escape(prefix));
    Regex::new(&pattern).expect("escaped prefix keeps the pattern valid")
}

/// Routes a matched value to the slug or path candidate set
fn classify_candidate(value: &str, slugs: &mut BTreeSet<String>, paths: &mut BTreeSet<String>) {
    let value = value.trim();
    if value.starts_with('/') {
        if value.len() > 1 && !value.contains(' ') && !is_asset_path(value) {
            paths.insert(value.to_string());
        }
    } else if !value.starts_with("http") {
        if let Some(slug) = validate_slug(value) {
            slugs.insert(slug);
        }
    }
}

/// Cleans and re-validates a slug candidate.
///
/// Strips everything outside `[A-Za-z0-9-]`, then requires a minimum
/// length and at least one hyphen. Short or hyphenless tokens are
/// overwhelmingly identifiers and locale codes, not routes.
fn validate_slug(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    if cleaned.len() >= MIN_SLUG_LEN && cleaned.contains('-') {
        Some(cleaned)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/blog").unwrap()
    }

    fn pad(payload: &str) -> String {
        // Pads a payload past the minimum-length cutoff.
        format!("{}{}", payload, " ".repeat(MIN_PAYLOAD_LEN))
    }

    #[test]
    fn test_object_slug_joined_with_prefix() {
        let payloads = vec![pad(r#"var posts = [{"slug":"my-post-title"}];"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert!(result.success);
        assert!(result.links.contains("https://example.com/blog/my-post-title"));
    }

    #[test]
    fn test_literal_route_prefix_match() {
        let payloads = vec![pad(r#"fetch("/blog/deep-dive-into-caching")"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert!(result
            .links
            .contains("https://example.com/blog/deep-dive-into-caching"));
    }

    #[test]
    fn test_router_push_argument() {
        let payloads = vec![pad(r#"onClick={() => router.push('/blog/new-release-notes')}"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert!(result
            .links
            .contains("https://example.com/blog/new-release-notes"));
    }

    #[test]
    fn test_window_location_assignment() {
        let payloads = vec![pad(r#"window.location.href = '/blog/launch-week-recap';"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert!(result
            .links
            .contains("https://example.com/blog/launch-week-recap"));
    }

    #[test]
    fn test_array_of_objects() {
        let payloads = vec![pad(
            r#"[{"slug":"first-entry","id":1},{"slug":"second-entry","id":2}]"#,
        )];
        let result = extract_from_scripts(&payloads, &page());

        assert!(result.links.contains("https://example.com/blog/first-entry"));
        assert!(result.links.contains("https://example.com/blog/second-entry"));
    }

    #[test]
    fn test_short_and_hyphenless_slugs_rejected() {
        let payloads = vec![pad(r#"{"slug":"abc"} {"slug":"nohyphens"} {"path":"en"}"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert!(!result.success);
        assert_eq!(result.count(), 0);
    }

    #[test]
    fn test_path_value_used_directly() {
        let payloads = vec![pad(r#"{"href":"/about-the-team"}"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert!(result.links.contains("https://example.com/about-the-team"));
    }

    #[test]
    fn test_asset_path_values_rejected() {
        let payloads = vec![pad(r#"{"url":"/static/chunk-abc.js"} {"path":"/img/hero-image.png"}"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert_eq!(result.count(), 0);
    }

    #[test]
    fn test_absolute_urls_in_nav_calls_skipped() {
        let payloads = vec![pad(r#"router.push("https://other.com/external-page-here")"#)];
        let result = extract_from_scripts(&payloads, &page());

        assert_eq!(result.count(), 0);
    }

    #[test]
    fn test_tiny_payload_skipped() {
        let payloads = vec![r#"{"slug":"my-post-title"}"#.to_string()];
        let result = extract_from_scripts(&payloads, &page());

        assert_eq!(result.count(), 0);
    }

    #[test]
    fn test_duplicates_collapse() {
        let payloads = vec![
            pad(r#"{"slug":"same-post-twice"}"#),
            pad(r#"router.push('/blog/same-post-twice')"#),
        ];
        let result = extract_from_scripts(&payloads, &page());

        assert_eq!(result.count(), 1);
    }

    #[test]
    fn test_root_page_prefix() {
        let root = Url::parse("https://example.com/").unwrap();
        let payloads = vec![pad(r#"{"slug":"standalone-article"}"#)];
        let result = extract_from_scripts(&payloads, &root);

        assert!(result.links.contains("https://example.com/standalone-article"));
    }

    #[test]
    fn test_zero_candidates_is_not_an_error() {
        let result = extract_from_scripts(&[pad("var x = 1;")], &page());
        assert!(!result.success);
        assert!(result.error.is_none());
    }
}
