//! Linkscout: a multi-strategy website link-discovery and crawl engine
//!
//! This crate crawls a website breadth-first from a seed URL, discovering
//! links with an escalating chain of strategies: static DOM parsing,
//! heuristic mining of compiled JavaScript bundles, and (when a renderer
//! capability is injected) runtime rendering with network interception
//! and bounded click probing. All discovered URLs are canonicalized and
//! deduplicated before they reach the crawl frontier.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod render;
pub mod resources;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for linkscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Failed to resolve '{raw}' against base: {message}")]
    Resolve { raw: String, message: String },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors produced while fetching a single resource.
///
/// These are always captured as data on the record or extraction result
/// that observed them; they never abort a crawl session.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("unsupported content type: {0}")]
    ContentType(String),
}

/// Errors produced by the injected headless-renderer capability.
///
/// A render error degrades the runtime strategy to a zero-link result;
/// it never fails the aggregator or the session.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("renderer operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("interaction failed: {0}")]
    Interaction(String),
}

/// Result type alias for linkscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlSession, CrawlSummary, FetchRecord, FetchStatus};
pub use extract::{discover_links, AggregatedResult, ExtractionResult, StrategyKind};
pub use render::{Renderer, RendererProvider};
pub use resources::{classify, ResourceKind};
pub use url::{canonicalize, canonicalize_str, same_origin};
