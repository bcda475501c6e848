//! Crawl frontier and session records
//!
//! This module contains the depth-bounded breadth-first crawl
//! controller: the session that owns the visited/discovered sets,
//! batches per-depth work under the concurrency cap, and builds the
//! end-of-session summary.

mod report;
mod session;

pub use report::{CrawlSummary, FetchRecord, FetchStatus};
pub use session::{crawl, CrawlSession, SessionState};
