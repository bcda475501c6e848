//! Static extraction strategy: fetch + markup scan
//!
//! The cheapest strategy. Parses the returned markup and collects link
//! candidates from anchors, stylesheet links, script and image sources,
//! and `url(...)` references inside inline style attributes. Page-link
//! discovery and asset collection share one scan of the document.

use crate::extract::{accept_page_link, ExtractionResult, StrategyKind};
use crate::url::{canonicalize, same_origin};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

static STYLE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).expect("hardcoded regex pattern is valid")
});

/// One pass over a parsed document
#[derive(Debug, Default, Clone)]
pub struct PageScan {
    /// Raw anchor targets, unresolved
    pub page_links: Vec<String>,

    /// Raw stylesheet/script/image references, unresolved
    pub asset_links: Vec<String>,

    /// Absolute same-origin external script URLs
    pub script_srcs: Vec<Url>,

    /// Inline script bodies
    pub inline_scripts: Vec<String>,
}

/// Scans an HTML document for link candidates and script payloads.
///
/// Collects raw anchor targets separately from asset references, and
/// pulls out script sources and inline script bodies for the
/// bundle-heuristic strategy.
///
/// # Arguments
///
/// * `html` - The markup to scan
/// * `base` - The page URL, used to resolve script sources
pub fn scan_document(html: &str, base: &Url) -> PageScan {
    let document = Html::parse_document(html);
    let mut scan = PageScan::default();

    let anchor = Selector::parse("a[href]").expect("hardcoded selector is valid");
    for element in document.select(&anchor) {
        if let Some(href) = element.value().attr("href") {
            scan.page_links.push(href.to_string());
        }
    }

    let link = Selector::parse("link[href]").expect("hardcoded selector is valid");
    for element in document.select(&link) {
        if let Some(href) = element.value().attr("href") {
            scan.asset_links.push(href.to_string());
        }
    }

    let img = Selector::parse("img[src]").expect("hardcoded selector is valid");
    for element in document.select(&img) {
        if let Some(src) = element.value().attr("src") {
            scan.asset_links.push(src.to_string());
        }
    }

    let styled = Selector::parse("[style]").expect("hardcoded selector is valid");
    for element in document.select(&styled) {
        if let Some(style) = element.value().attr("style") {
            for capture in STYLE_URL_RE.captures_iter(style) {
                scan.asset_links.push(capture[1].trim().to_string());
            }
        }
    }

    let script = Selector::parse("script").expect("hardcoded selector is valid");
    for element in document.select(&script) {
        if let Some(src) = element.value().attr("src") {
            scan.asset_links.push(src.to_string());
            if let Ok(resolved) = canonicalize(src, base) {
                if same_origin(&resolved, base) {
                    scan.script_srcs.push(resolved);
                }
            }
        } else {
            let body: String = element.text().collect();
            if !body.trim().is_empty() {
                scan.inline_scripts.push(body);
            }
        }
    }

    scan
}

/// Builds the static strategy result from a document scan.
///
/// Anchor candidates pass through the shared same-origin filter, asset
/// drop, and canonicalizer; duplicates collapse on insertion.
pub fn extract_static(scan: &PageScan, page_url: &Url) -> ExtractionResult {
    let links: BTreeSet<String> = scan
        .page_links
        .iter()
        .filter_map(|raw| accept_page_link(raw, page_url))
        .collect();

    let mut result = ExtractionResult::empty(StrategyKind::Static);
    result.notes.push(format!(
        "{} anchor candidates, {} accepted",
        scan.page_links.len(),
        links.len()
    ));
    result.success = !links.is_empty();
    result.links = links;
    result
}

/// Resolves the scanned asset references to canonical same-origin URLs
pub fn same_origin_assets(scan: &PageScan, page_url: &Url) -> Vec<Url> {
    let mut seen = BTreeSet::new();
    let mut assets = Vec::new();
    for raw in &scan.asset_links {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with("data:") {
            continue;
        }
        if let Ok(url) = canonicalize(raw, page_url) {
            if same_origin(&url, page_url) && seen.insert(url.to_string()) {
                assets.push(url);
            }
        }
    }
    assets
}
