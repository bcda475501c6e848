//! Session records and the end-of-crawl summary
//!
//! One [`FetchRecord`] is appended per processed target; the
//! [`CrawlSummary`] is built once at session end and handed to the
//! caller, which owns persistence.

use crate::resources::ResourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terminal state of one fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Error,
    Skipped,
}

/// The immutable record of one processed crawl target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRecord {
    /// Canonical URL of the target
    pub url: String,

    /// Classified resource kind
    pub kind: ResourceKind,

    /// Body size in bytes; zero when the fetch failed
    pub size: u64,

    /// Content-Type header value, if the response carried one
    pub content_type: Option<String>,

    /// Depth at which this target was processed
    pub depth: u32,

    /// Terminal state of the fetch
    pub status: FetchStatus,

    /// Number of previously unknown links this target contributed
    pub links_found: u32,

    /// Failure description for error records
    pub error: Option<String>,
}

/// Everything one crawl session produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// When the session completed
    pub finished_at: DateTime<Utc>,

    /// The canonical seed URL
    pub base_url: String,

    /// The configured depth bound
    pub max_depth: u32,

    /// Number of successfully fetched resources
    pub total_fetched: usize,

    /// Number of distinct canonical URLs discovered, fetched or not
    pub total_discovered: usize,

    /// Successful fetches grouped by resource kind
    pub kind_counts: BTreeMap<ResourceKind, usize>,

    /// The full per-target fetch log, in completion order
    pub records: Vec<FetchRecord>,
}
