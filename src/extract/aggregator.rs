//! Strategy aggregation and escalation
//!
//! Runs the extraction strategies in increasing cost order and stops as
//! soon as the cheaper tiers have yielded enough links. Runtime
//! rendering costs roughly an order of magnitude more than a static
//! fetch, so it only runs when static and bundle mining under-yield.
//! Per-strategy failures are collected as data; the pipeline never
//! aborts.

use crate::config::StrategyConfig;
use crate::extract::static_dom::{extract_static, same_origin_assets, scan_document};
use crate::extract::{extract_bundle, extract_runtime, ExtractionResult, StrategyKind};
use crate::fetch::{fetch_page, fetch_text, FetchedPage};
use crate::render::RendererProvider;
use crate::url::canonicalize_str;
use crate::{FetchError, ScoutError};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

/// The merged outcome of all strategies run against one URL
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedResult {
    /// True iff the merged link set is non-empty
    pub success: bool,

    /// The canonical URL the strategies ran against
    pub url: String,

    /// Union of all strategies' canonical link sets
    pub links: BTreeSet<String>,

    /// Number of links in the union
    pub count: usize,

    /// Which strategies ran, in escalation order
    pub strategies_used: Vec<StrategyKind>,

    /// Non-fatal per-strategy errors, prefixed with the strategy name
    pub errors: Vec<String>,
}

/// Everything the frontier needs from one processed page
#[derive(Debug)]
pub struct PageDiscovery {
    /// The merged strategy outcome
    pub aggregated: AggregatedResult,

    /// The fetched page, when the static fetch succeeded
    pub fetch: Option<FetchedPage>,

    /// Canonical same-origin asset URLs found in the markup
    pub assets: Vec<Url>,
}

/// Discovers links on a single URL with strategy escalation.
///
/// The public single-URL API: accepts a raw URL string, canonicalizes
/// it, and runs the escalation chain without any crawling recursion.
///
/// # Errors
///
/// Fails only when `url` is not a valid absolute HTTP(S) URL; every
/// downstream failure is reported inside the returned result.
pub async fn discover_links(
    client: &Client,
    renderers: Option<&dyn RendererProvider>,
    url: &str,
    config: &StrategyConfig,
) -> Result<AggregatedResult, ScoutError> {
    let url = canonicalize_str(url)?;
    let discovery = discover_page(client, renderers, &url, config).await;
    Ok(discovery.aggregated)
}

/// Runs the escalation chain against one canonical URL.
///
/// Used by the crawl frontier, which also needs the fetched body and
/// the asset links so it can classify and persist without refetching.
pub async fn discover_page(
    client: &Client,
    renderers: Option<&dyn RendererProvider>,
    url: &Url,
    config: &StrategyConfig,
) -> PageDiscovery {
    let mut links: BTreeSet<String> = BTreeSet::new();
    let mut strategies_used = Vec::new();
    let mut errors = Vec::new();
    let mut assets = Vec::new();
    let mut fetch = None;
    let mut scan = None;

    // Tier 1: static fetch + markup scan.
    strategies_used.push(StrategyKind::Static);
    match fetch_page(client, url).await {
        Ok(page) => {
            if page.is_html() {
                let document_scan = scan_document(&page.text(), &page.final_url);
                let result = extract_static(&document_scan, &page.final_url);
                log_result(url, &result);
                links.extend(result.links);
                assets = same_origin_assets(&document_scan, &page.final_url);
                scan = Some(document_scan);
            } else {
                let kind = page.content_type.clone().unwrap_or_default();
                errors.push(format!("static: {}", FetchError::ContentType(kind)));
            }
            fetch = Some(page);
        }
        Err(e) => {
            errors.push(format!("static: {}", e));
        }
    }

    // Tier 2: bundle mining over script payloads and embedded data.
    if links.len() < config.min_link_threshold {
        if let (Some(scan), Some(page)) = (&scan, &fetch) {
            strategies_used.push(StrategyKind::Bundle);

            let mut payloads = scan.inline_scripts.clone();
            let mut fetch_failures = 0usize;
            for script_url in scan.script_srcs.iter().take(config.max_scripts) {
                match fetch_text(client, script_url).await {
                    Ok(body) => payloads.push(body),
                    Err(e) => {
                        fetch_failures += 1;
                        tracing::debug!("script fetch failed for {}: {}", script_url, e);
                    }
                }
            }

            let mut result = extract_bundle(&payloads, Some(&page.text()), &page.final_url);
            if fetch_failures > 0 {
                result
                    .notes
                    .push(format!("{} script fetches failed", fetch_failures));
            }
            log_result(url, &result);
            if let Some(e) = &result.error {
                errors.push(format!("bundle: {}", e));
            }
            links.extend(result.links);
        }
    }

    // Tier 3: runtime rendering, only when still under-yielding.
    if links.len() < config.min_link_threshold {
        if let Some(provider) = renderers {
            match provider.new_context().await {
                Ok(mut renderer) => {
                    strategies_used.push(StrategyKind::Runtime);
                    let result = extract_runtime(renderer.as_mut(), url, config).await;
                    log_result(url, &result);
                    if let Some(e) = &result.error {
                        errors.push(format!("runtime: {}", e));
                    }
                    links.extend(result.links);
                }
                Err(e) => {
                    errors.push(format!("runtime: {}", e));
                }
            }
        }
    }

    let aggregated = AggregatedResult {
        success: !links.is_empty(),
        url: url.to_string(),
        count: links.len(),
        links,
        strategies_used,
        errors,
    };

    PageDiscovery {
        aggregated,
        fetch,
        assets,
    }
}

/// Logs one strategy's outcome before it is merged and discarded
fn log_result(url: &Url, result: &ExtractionResult) {
    tracing::debug!(
        "{} strategy on {}: success={} links={} notes={:?}",
        result.strategy,
        url,
        result.success,
        result.count(),
        result.notes
    );
}
