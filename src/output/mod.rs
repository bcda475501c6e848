//! Persistence collaborators for the crawl engine
//!
//! The engine itself never touches the filesystem; the session hands
//! fetched bodies to a [`ResourceSink`] and its caller persists the
//! [`CrawlSummary`](crate::crawler::CrawlSummary). This module provides
//! the trait seam plus the filesystem implementations the CLI wires in.

mod sink;
mod summary;

pub use sink::{DiskSink, ResourceSink};
pub use summary::{format_summary_json, write_summary_json};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
