//! JSON summary persistence
//!
//! Writes the end-of-session [`CrawlSummary`] as one structured JSON
//! document: timestamps, counts by resource kind, and the full per-URL
//! fetch log.

use crate::crawler::CrawlSummary;
use crate::output::OutputResult;
use std::path::Path;

/// Writes a crawl summary as pretty-printed JSON
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `path` - Path where the JSON file should be written
pub fn write_summary_json(summary: &CrawlSummary, path: &Path) -> OutputResult<()> {
    let json = format_summary_json(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Formats a crawl summary as a pretty-printed JSON string
pub fn format_summary_json(summary: &CrawlSummary) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
