//! Configuration module for linkscout
//!
//! This module handles loading, parsing, and validating TOML
//! configuration files. Every section and key has a default, so an
//! empty or partial file (or `Config::default()`) yields a working
//! engine.
//!
//! # Example
//!
//! ```no_run
//! use linkscout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkscout.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, StrategyConfig};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
