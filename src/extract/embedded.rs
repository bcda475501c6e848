//! Framework-embedded serialized data mining
//!
//! The secondary pass of the bundle strategy. Server-rendered
//! single-page frameworks ship their route data inside serialized
//! payloads embedded in the page: a `__NEXT_DATA__` JSON block, or
//! streamed `self.__next_f.push` fragments. This pass parses those
//! payloads and walks the resulting structure for route-shaped values.
//!
//! The walk is bounded by nesting depth rather than cycle detection:
//! freshly parsed JSON is acyclic, so a depth counter guards only
//! against pathological nesting.

use crate::extract::accept_page_link;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Maximum nesting depth followed by the structural walk
const MAX_WALK_DEPTH: u32 = 10;

/// Object keys whose string values are treated as route candidates
const ROUTE_KEYS: &[&str] = &["slug", "path", "href", "url", "permalink"];

static NEXT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script id="__NEXT_DATA__" type="application/json">(.*?)</script>"#)
        .expect("hardcoded regex pattern is valid")
});

static NEXT_F_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"self\.__next_f\.push\(\[\d+,"((?:[^"\\]|\\.)*)"\]\)"#)
        .expect("hardcoded regex pattern is valid")
});

/// What one markup scan recovered
pub(crate) struct EmbeddedScan {
    /// Canonical links found by walking parsed payloads
    pub links: BTreeSet<String>,

    /// Payloads that failed to parse as JSON; callers may still run the
    /// raw pattern battery over them
    pub unparsed: Vec<String>,

    /// Provenance notes
    pub notes: Vec<String>,
}

/// Scans page markup for framework-embedded serialized route data.
pub(crate) fn scan_embedded(html: &str, page_url: &Url) -> EmbeddedScan {
    let mut scan = EmbeddedScan {
        links: BTreeSet::new(),
        unparsed: Vec::new(),
        notes: Vec::new(),
    };

    for capture in NEXT_DATA_RE.captures_iter(html) {
        match serde_json::from_str::<Value>(&capture[1]) {
            Ok(value) => walk_value(&value, 0, page_url, &mut scan.links),
            Err(e) => {
                scan.notes
                    .push(format!("malformed __NEXT_DATA__ payload skipped: {}", e));
            }
        }
    }

    let mut push_fragments = 0usize;
    for capture in NEXT_F_RE.captures_iter(html) {
        push_fragments += 1;
        let unescaped = unescape_js_string(&capture[1]);
        match serde_json::from_str::<Value>(&unescaped) {
            Ok(value) => walk_value(&value, 0, page_url, &mut scan.links),
            Err(_) => scan.unparsed.push(unescaped),
        }
    }

    if push_fragments > 0 {
        scan.notes
            .push(format!("{} __next_f fragments inspected", push_fragments));
    }

    scan
}

/// Convenience wrapper returning just links and notes
pub(crate) fn embedded_candidates(html: &str, page_url: &Url) -> (BTreeSet<String>, Vec<String>) {
    let scan = scan_embedded(html, page_url);
    (scan.links, scan.notes)
}

/// Recursively walks a parsed payload for route-shaped values
fn walk_value(value: &Value, depth: u32, page_url: &Url, out: &mut BTreeSet<String>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if let Value::String(s) = child {
                    if ROUTE_KEYS.contains(&key.to_lowercase().as_str()) {
                        record_candidate(s, page_url, out);
                    }
                }
                walk_value(child, depth + 1, page_url, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_value(item, depth + 1, page_url, out);
            }
        }
        _ => {}
    }
}

/// Accepts a candidate string if it is a non-asset site-relative path
fn record_candidate(value: &str, page_url: &Url, out: &mut BTreeSet<String>) {
    if value.starts_with('/') && value.len() > 1 && !value.contains(' ') {
        if let Some(link) = accept_page_link(value, page_url) {
            out.insert(link);
        }
    }
}

/// Undoes one level of JavaScript string escaping
fn unescape_js_string(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => result.push('"'),
                Some('\\') => result.push('\\'),
                Some('/') => result.push('/'),
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}
