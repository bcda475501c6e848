//! Link-extraction strategies and their aggregator
//!
//! Three strategies feed the crawl frontier, run in increasing cost
//! order by the aggregator: a static DOM scan, heuristic mining of
//! compiled JavaScript bundles, and runtime rendering with network
//! interception and bounded click probing. Every strategy reports its
//! findings as an [`ExtractionResult`] of canonical, same-origin URLs;
//! the aggregator merges them and records provenance per strategy.

mod aggregator;
mod bundle;
mod embedded;
mod runtime;
mod static_dom;

pub use aggregator::{discover_links, discover_page, AggregatedResult, PageDiscovery};
pub use bundle::extract_bundle;
pub use runtime::extract_runtime;
pub use static_dom::{extract_static, scan_document, PageScan};

use crate::url::{canonicalize, same_origin};
use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

/// URL substrings that mark static assets rather than pages.
///
/// Page-link discovery drops these; they only matter when mirroring.
const ASSET_MARKERS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".avif", ".js", ".css", ".woff",
    ".woff2", "cdn", "assets", "static",
];

/// Schemes and pseudo-targets skipped before resolution
const SKIPPED_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "javascript:", "data:"];

/// The interchangeable link-discovery methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Plain fetch + markup scan
    Static,
    /// Pattern mining over compiled script payloads and embedded data
    Bundle,
    /// Headless rendering, interception, and click probing
    Runtime,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Static => "static",
            Self::Bundle => "bundle",
            Self::Runtime => "runtime",
        };
        write!(f, "{}", name)
    }
}

/// The outcome of one strategy invocation
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Which strategy produced this result
    pub strategy: StrategyKind,

    /// Whether the strategy ran to completion and found at least one link
    pub success: bool,

    /// Canonical same-origin links, deduplicated
    pub links: BTreeSet<String>,

    /// Failure description when the strategy could not run
    pub error: Option<String>,

    /// Provenance notes (match counts, click outcomes, skipped payloads)
    pub notes: Vec<String>,
}

impl ExtractionResult {
    /// An empty result for a strategy that ran but found nothing
    pub fn empty(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            success: false,
            links: BTreeSet::new(),
            error: None,
            notes: Vec::new(),
        }
    }

    /// A result for a strategy that could not run at all
    pub fn failed(strategy: StrategyKind, error: impl Into<String>) -> Self {
        Self {
            strategy,
            success: false,
            links: BTreeSet::new(),
            error: Some(error.into()),
            notes: Vec::new(),
        }
    }

    /// Number of links this strategy yielded
    pub fn count(&self) -> usize {
        self.links.len()
    }
}

/// Filters and canonicalizes one raw link candidate for page discovery.
///
/// Applies, in order: the scheme/pseudo-target skip list, resolution
/// against the page URL, the same-origin check, and the static-asset
/// drop. Survivors come back as canonical strings ready for set
/// insertion.
pub(crate) fn accept_page_link(raw: &str, page_url: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for prefix in SKIPPED_PREFIXES {
        if raw.starts_with(prefix) {
            return None;
        }
    }

    let url = canonicalize(raw, page_url).ok()?;

    if !same_origin(&url, page_url) {
        return None;
    }

    if is_asset_path(url.as_str()) {
        return None;
    }

    Some(url.to_string())
}

/// Returns true if a URL string points at an obvious static asset
pub(crate) fn is_asset_path(url: &str) -> bool {
    let lower = url.to_lowercase();
    ASSET_MARKERS.iter().any(|marker| lower.contains(marker))
}
