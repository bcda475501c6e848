//! Runtime extraction strategy
//!
//! The most expensive tier, invoked only when cheaper strategies
//! under-yield. Drives an injected headless renderer to load the page
//! and let its scripts execute, then harvests three signal sources:
//! the live DOM (anchors and data-attribute navigation targets),
//! intercepted network responses re-run through the bundle pattern
//! battery, and bounded click probing of repeated-pattern interactive
//! elements.

use crate::config::StrategyConfig;
use crate::extract::bundle::extract_from_scripts;
use crate::extract::{accept_page_link, ExtractionResult, StrategyKind};
use crate::render::Renderer;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Runs the runtime strategy against one page.
///
/// Renderer launch or navigation failure degrades this strategy to a
/// failed zero-link result; individual click failures are recorded in
/// the notes and skipped.
///
/// # Arguments
///
/// * `renderer` - An isolated browsing context for this page
/// * `url` - The page to render
/// * `config` - Click caps and timeouts
pub async fn extract_runtime(
    renderer: &mut dyn Renderer,
    url: &Url,
    config: &StrategyConfig,
) -> ExtractionResult {
    let render_timeout = Duration::from_secs(config.render_timeout_secs);
    let click_timeout = Duration::from_millis(config.click_timeout_millis);

    let navigation = match renderer.navigate(url, render_timeout).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("runtime strategy could not render {}: {}", url, e);
            return ExtractionResult::failed(StrategyKind::Runtime, e.to_string());
        }
    };

    let mut result = ExtractionResult::empty(StrategyKind::Runtime);

    if let Err(e) = renderer.wait_for_idle(render_timeout).await {
        result.notes.push(format!("idle wait gave up: {}", e));
    }

    // Signal 1: the rendered DOM.
    match renderer.anchor_targets().await {
        Ok(targets) => {
            let before = result.links.len();
            for raw in &targets {
                if let Some(link) = accept_page_link(raw, url) {
                    result.links.insert(link);
                }
            }
            result.notes.push(format!(
                "{} DOM targets, {} accepted",
                targets.len(),
                result.links.len() - before
            ));
        }
        Err(e) => result.notes.push(format!("DOM harvest failed: {}", e)),
    }

    // Signal 2: intercepted responses, mined like script bundles.
    let data_payloads: Vec<String> = navigation
        .responses
        .iter()
        .filter(|r| r.is_data_like())
        .map(|r| r.body.clone())
        .collect();
    if !data_payloads.is_empty() {
        let mined = extract_from_scripts(&data_payloads, url);
        result.notes.push(format!(
            "{} intercepted payloads, {} links mined",
            data_payloads.len(),
            mined.count()
        ));
        result.links.extend(mined.links);
    }

    // Signal 3: click probing of repeated interactive patterns.
    if config.max_total_clicks > 0 {
        probe_interactive_elements(renderer, url, config, click_timeout, render_timeout, &mut result)
            .await;
    }

    result.success = !result.links.is_empty();
    result
}

/// Clicks a capped number of representative elements from repeated
/// class-signature groups and records any resulting navigation.
///
/// A repeated class signature is a proxy for a list-item or card
/// component; one-off signatures are not worth the click budget.
async fn probe_interactive_elements(
    renderer: &mut dyn Renderer,
    url: &Url,
    config: &StrategyConfig,
    click_timeout: Duration,
    render_timeout: Duration,
    result: &mut ExtractionResult,
) {
    let elements = match renderer.interactive_elements().await {
        Ok(elements) => elements,
        Err(e) => {
            result.notes.push(format!("element scan failed: {}", e));
            return;
        }
    };

    let mut groups: HashMap<String, usize> = HashMap::new();
    for element in elements.iter().filter(|e| e.visible) {
        if !element.class_signature.trim().is_empty() {
            *groups.entry(element.class_signature.clone()).or_insert(0) += 1;
        }
    }

    let mut repeated: Vec<(String, usize)> = groups
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    repeated.truncate(config.max_probe_groups);

    if repeated.is_empty() {
        result
            .notes
            .push("no repeated class patterns, skipping click probing".to_string());
        return;
    }

    let mut total_clicks = 0usize;
    let mut navigations = 0usize;

    'groups: for (signature, member_count) in &repeated {
        let representatives = (*member_count).min(config.max_clicks_per_group);
        for index in 0..representatives {
            if total_clicks >= config.max_total_clicks {
                break 'groups;
            }
            total_clicks += 1;

            match renderer.click(signature, index, click_timeout).await {
                Ok(outcome) => {
                    if let Some(destination) = outcome.navigated_to {
                        if let Some(link) = accept_page_link(&destination, url) {
                            result.links.insert(link);
                        }
                        navigations += 1;
                        if let Err(e) = renderer.go_back(render_timeout).await {
                            result
                                .notes
                                .push(format!("go_back failed, probing stopped: {}", e));
                            break 'groups;
                        }
                    }
                }
                Err(e) => {
                    result
                        .notes
                        .push(format!("click on '{}'[{}] failed: {}", signature, index, e));
                }
            }
        }
    }

    result.notes.push(format!(
        "{} groups probed, {} clicks, {} navigations",
        repeated.len(),
        total_clicks,
        navigations
    ));
}
