//! Crawl session: the depth-bounded breadth-first frontier
//!
//! One [`CrawlSession`] owns all crawl state for one seed URL: the
//! visited and discovered sets, the per-target fetch log, and the
//! escalation configuration. Depth levels run strictly sequentially;
//! within a depth, targets are fetched and extracted concurrently under
//! the configured limit, and the shared sets are only touched on the
//! coordinating task between batches, so they need no locking.

use crate::config::Config;
use crate::crawler::report::{CrawlSummary, FetchRecord, FetchStatus};
use crate::extract::discover_page;
use crate::fetch::{build_http_client, fetch_page};
use crate::output::ResourceSink;
use crate::render::RendererProvider;
use crate::resources::{classify, ResourceKind};
use crate::url::canonicalize_str;
use crate::ScoutError;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use url::Url;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet run
    Idle,
    /// Processing targets at the contained depth
    Draining(u32),
    /// Finished; the summary has been built
    Completed,
}

/// One crawl session for one seed URL.
///
/// All state lives here and dies with the session; nothing is shared
/// across sessions except the read-only configuration.
pub struct CrawlSession<'a> {
    config: Config,
    client: Client,
    renderers: Option<&'a dyn RendererProvider>,
    state: SessionState,
    visited: HashSet<String>,
    discovered: BTreeMap<String, u32>,
    records: Vec<FetchRecord>,
}

/// What one concurrent fetch+extract task hands back to the coordinator
struct TargetOutcome {
    url: Url,
    kind: ResourceKind,
    rel_path: String,
    status: FetchStatus,
    content_type: Option<String>,
    size: u64,
    error: Option<String>,
    links: BTreeSet<String>,
    assets: Vec<Url>,
    body: Option<Vec<u8>>,
}

impl<'a> CrawlSession<'a> {
    /// Creates a session, building its HTTP client from the configuration
    pub fn new(
        config: Config,
        renderers: Option<&'a dyn RendererProvider>,
    ) -> Result<Self, ScoutError> {
        crate::config::validate(&config)?;
        let client = build_http_client(&config.http)?;
        Ok(Self {
            config,
            client,
            renderers,
            state: SessionState::Idle,
            visited: HashSet::new(),
            discovered: BTreeMap::new(),
            records: Vec::new(),
        })
    }

    /// Returns where the session currently is in its lifecycle
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session to completion and returns its summary.
    ///
    /// The only fatal failure is an invalid seed URL. Every per-target
    /// failure is recorded on the corresponding [`FetchRecord`] and the
    /// session carries on.
    ///
    /// # Arguments
    ///
    /// * `seed` - The URL the crawl starts from
    /// * `sink` - Optional sink receiving every successfully fetched body
    pub async fn run(
        &mut self,
        seed: &str,
        mut sink: Option<&mut dyn ResourceSink>,
    ) -> Result<CrawlSummary, ScoutError> {
        let seed = canonicalize_str(seed)?;
        let base_url = seed.to_string();
        let started_at = Utc::now();
        let max_depth = self.config.crawler.max_depth;

        tracing::info!("starting crawl of {} to depth {}", base_url, max_depth);
        self.discovered.insert(base_url.clone(), 0);

        for depth in 0..=max_depth {
            let batch = self.select_batch(depth);
            if batch.is_empty() {
                tracing::info!("no unvisited targets at depth {}, stopping early", depth);
                break;
            }
            self.state = SessionState::Draining(depth);

            // Marked before dispatch: a target counts as visited once
            // its fetch has been attempted.
            for url in &batch {
                self.visited.insert(url.clone());
            }

            tracing::info!("depth {}: processing {} targets", depth, batch.len());

            let client = &self.client;
            let config = &self.config;
            let renderers = self.renderers;
            let outcomes: Vec<TargetOutcome> = stream::iter(
                batch
                    .into_iter()
                    .filter_map(|raw| Url::parse(&raw).ok())
                    .map(|url| process_target(client, renderers, config, url, depth)),
            )
            .buffer_unordered(self.config.crawler.concurrency as usize)
            .collect()
            .await;

            for outcome in outcomes {
                self.merge_outcome(outcome, depth, &mut sink).await;
            }
        }

        self.state = SessionState::Completed;
        let summary = self.build_summary(base_url, started_at, max_depth);
        tracing::info!(
            "crawl completed: {} fetched, {} discovered",
            summary.total_fetched,
            summary.total_discovered
        );
        Ok(summary)
    }

    /// Selects the unvisited targets at a depth, applying the hard
    /// per-depth cap; surplus targets are dropped from this session.
    fn select_batch(&self, depth: u32) -> Vec<String> {
        let cap = self.config.crawler.max_urls_per_depth as usize;
        let eligible: Vec<String> = self
            .discovered
            .iter()
            .filter(|(url, d)| **d == depth && !self.visited.contains(*url))
            .map(|(url, _)| url.clone())
            .collect();

        if eligible.len() > cap {
            tracing::warn!(
                "depth {}: dropping {} targets over the per-depth cap of {}",
                depth,
                eligible.len() - cap,
                cap
            );
        }

        eligible.into_iter().take(cap).collect()
    }

    /// Folds one target's outcome into the session state
    async fn merge_outcome(
        &mut self,
        outcome: TargetOutcome,
        depth: u32,
        sink: &mut Option<&mut dyn ResourceSink>,
    ) {
        let mut new_links = 0u32;
        for link in &outcome.links {
            if !self.visited.contains(link) && !self.discovered.contains_key(link) {
                self.discovered.insert(link.clone(), depth + 1);
                new_links += 1;
            }
        }

        if self.config.crawler.mirror_assets {
            for asset in &outcome.assets {
                let asset = asset.to_string();
                if !self.visited.contains(&asset) && !self.discovered.contains_key(&asset) {
                    self.discovered.insert(asset, depth + 1);
                }
            }
        }

        if let (Some(sink), Some(body)) = (sink.as_mut(), &outcome.body) {
            if outcome.status == FetchStatus::Success {
                if let Err(e) = sink
                    .store(&outcome.url, outcome.kind, &outcome.rel_path, body)
                    .await
                {
                    tracing::warn!("failed to store {}: {}", outcome.url, e);
                }
            }
        }

        self.records.push(FetchRecord {
            url: outcome.url.to_string(),
            kind: outcome.kind,
            size: outcome.size,
            content_type: outcome.content_type,
            depth,
            status: outcome.status,
            links_found: new_links,
            error: outcome.error,
        });
    }

    /// Builds the end-of-session summary from the accumulated state
    fn build_summary(
        &self,
        base_url: String,
        started_at: chrono::DateTime<Utc>,
        max_depth: u32,
    ) -> CrawlSummary {
        let mut kind_counts: BTreeMap<ResourceKind, usize> = BTreeMap::new();
        let mut total_fetched = 0;
        for record in &self.records {
            if record.status == FetchStatus::Success {
                total_fetched += 1;
                *kind_counts.entry(record.kind).or_insert(0) += 1;
            }
        }

        CrawlSummary {
            started_at,
            finished_at: Utc::now(),
            base_url,
            max_depth,
            total_fetched,
            total_discovered: self.discovered.len(),
            kind_counts,
            records: self.records.clone(),
        }
    }
}

/// Fetches and extracts one crawl target.
///
/// HTML-classified targets run the full strategy escalation; everything
/// else is a plain download recorded with its classified kind.
async fn process_target(
    client: &Client,
    renderers: Option<&dyn RendererProvider>,
    config: &Config,
    url: Url,
    depth: u32,
) -> TargetOutcome {
    tracing::debug!("[depth {}] processing {}", depth, url);

    let (guessed_kind, _) = classify(&url, None);
    if guessed_kind.is_scannable() {
        process_page(client, renderers, config, url).await
    } else {
        process_resource(client, url, guessed_kind).await
    }
}

/// Runs the strategy escalation against a page target
async fn process_page(
    client: &Client,
    renderers: Option<&dyn RendererProvider>,
    config: &Config,
    url: Url,
) -> TargetOutcome {
    let discovery = discover_page(client, renderers, &url, &config.strategies).await;

    match discovery.fetch {
        Some(page) => {
            let (kind, rel_path) = classify(&url, page.content_type.as_deref());
            TargetOutcome {
                url,
                kind,
                rel_path,
                status: FetchStatus::Success,
                content_type: page.content_type.clone(),
                size: page.body.len() as u64,
                error: None,
                links: discovery.aggregated.links,
                assets: discovery.assets,
                body: Some(page.body),
            }
        }
        None => {
            let (kind, rel_path) = classify(&url, None);
            let error = discovery
                .aggregated
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| "fetch failed".to_string());
            TargetOutcome {
                url,
                kind,
                rel_path,
                status: FetchStatus::Error,
                content_type: None,
                size: 0,
                error: Some(error),
                // The runtime tier can still have found links even
                // though the plain fetch failed.
                links: discovery.aggregated.links,
                assets: discovery.assets,
                body: None,
            }
        }
    }
}

/// Plain download of a non-page resource
async fn process_resource(client: &Client, url: Url, guessed_kind: ResourceKind) -> TargetOutcome {
    match fetch_page(client, &url).await {
        Ok(page) => {
            let (kind, rel_path) = classify(&url, page.content_type.as_deref());
            TargetOutcome {
                url,
                kind,
                rel_path,
                status: FetchStatus::Success,
                content_type: page.content_type.clone(),
                size: page.body.len() as u64,
                error: None,
                links: BTreeSet::new(),
                assets: Vec::new(),
                body: Some(page.body),
            }
        }
        Err(e) => {
            let (_, rel_path) = classify(&url, None);
            TargetOutcome {
                url,
                kind: guessed_kind,
                rel_path,
                status: FetchStatus::Error,
                content_type: None,
                size: 0,
                error: Some(e.to_string()),
                links: BTreeSet::new(),
                assets: Vec::new(),
                body: None,
            }
        }
    }
}

/// Runs one complete crawl session.
///
/// This is the main library entry point: canonicalize the seed, crawl
/// breadth-first to the configured depth, and return the summary. Fails
/// only when the seed URL is invalid.
///
/// # Arguments
///
/// * `seed` - The URL to start from
/// * `config` - Engine configuration
/// * `renderers` - Optional renderer capability for the runtime strategy
/// * `sink` - Optional sink receiving every successfully fetched body
///
/// # Example
///
/// ```no_run
/// use linkscout::config::Config;
/// use linkscout::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = crawl("https://example.com", &Config::default(), None, None).await?;
/// println!("fetched {} resources", summary.total_fetched);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    seed: &str,
    config: &Config,
    renderers: Option<&dyn RendererProvider>,
    sink: Option<&mut dyn ResourceSink>,
) -> Result<CrawlSummary, ScoutError> {
    let mut session = CrawlSession::new(config.clone(), renderers)?;
    session.run(seed, sink).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_seed_is_fatal() {
        let result = crawl("definitely not a url", &Config::default(), None, None).await;
        assert!(matches!(result, Err(ScoutError::Url(_))));
    }

    #[tokio::test]
    async fn test_relative_seed_is_fatal() {
        let result = crawl("/relative/path", &Config::default(), None, None).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = CrawlSession::new(Config::default(), None).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_select_batch_caps_and_skips_visited() {
        let mut config = Config::default();
        config.crawler.max_urls_per_depth = 2;
        let mut session = CrawlSession::new(config, None).unwrap();

        session.discovered.insert("https://example.com/a".to_string(), 1);
        session.discovered.insert("https://example.com/b".to_string(), 1);
        session.discovered.insert("https://example.com/c".to_string(), 1);
        session.discovered.insert("https://example.com/d".to_string(), 2);
        session.visited.insert("https://example.com/a".to_string());

        let batch = session.select_batch(1);
        assert_eq!(batch.len(), 2);
        assert!(!batch.contains(&"https://example.com/a".to_string()));
        assert!(!batch.contains(&"https://example.com/d".to_string()));
    }

    #[test]
    fn test_select_batch_empty_depth() {
        let session = CrawlSession::new(Config::default(), None).unwrap();
        assert!(session.select_batch(0).is_empty());
    }
}
