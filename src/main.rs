//! Linkscout main entry point
//!
//! Command-line interface for the multi-strategy crawl engine: crawl a
//! seed URL breadth-first, optionally mirror fetched resources to disk,
//! and write a JSON summary of the session.

use anyhow::Context;
use clap::Parser;
use linkscout::config::{load_config, Config};
use linkscout::crawler::crawl;
use linkscout::output::{write_summary_json, DiskSink, ResourceSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkscout: multi-strategy website link discovery
///
/// Crawls a website from a seed URL, tolerating sites that hide their
/// navigation inside client-side JavaScript bundles. Discovered links
/// are deduplicated, fetched breadth-first to a depth bound, and the
/// session is summarized as a JSON document.
#[derive(Parser, Debug)]
#[command(name = "linkscout")]
#[command(version)]
#[command(about = "Multi-strategy website link discovery", long_about = None)]
struct Cli {
    /// Seed URL to crawl from
    #[arg(value_name = "URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured maximum crawl depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Override the configured concurrency limit
    #[arg(long)]
    concurrency: Option<u32>,

    /// Mirror fetched resources into the configured output directory
    #[arg(long)]
    mirror: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if cli.mirror {
        config.crawler.mirror_assets = true;
    }

    let mut sink = if cli.mirror {
        let sink = DiskSink::new(&config.output.mirror_dir)
            .await
            .with_context(|| format!("creating mirror directory {}", config.output.mirror_dir))?;
        Some(sink)
    } else {
        None
    };

    let summary = crawl(
        &cli.seed,
        &config,
        None,
        sink.as_mut().map(|s| s as &mut dyn ResourceSink),
    )
    .await
    .context("crawl failed")?;

    let summary_path = PathBuf::from(&config.output.summary_path);
    write_summary_json(&summary, &summary_path)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    println!(
        "Crawl of {} complete: {} fetched, {} discovered",
        summary.base_url, summary.total_fetched, summary.total_discovered
    );
    for (kind, count) in &summary.kind_counts {
        println!("  {}: {}", kind, count);
    }
    println!("Summary written to {}", summary_path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkscout=info,warn"),
            1 => EnvFilter::new("linkscout=debug,info"),
            2 => EnvFilter::new("linkscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
