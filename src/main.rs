//! Ripple-Map main entry point
//!
//! This is the command-line interface for the Ripple-Map link mapper.

use anyhow::Context;
use clap::Parser;
use ripple_map::config::{load_config_with_hash, Config};
use ripple_map::crawler::crawl;
use ripple_map::output::{format_edges, print_statistics, render_edges, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Map: a bounded-depth, single-domain link mapper
///
/// Ripple-Map fetches the root URL, follows same-domain links level by level
/// up to the scan depth, and prints which page links to which sub page.
#[derive(Parser, Debug)]
#[command(name = "ripple-map")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-depth, single-domain link mapper", long_about = None)]
struct Cli {
    /// Root URL in the form http://domain.tld
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the scan depth from the configuration
    #[arg(short, long)]
    depth: Option<u32>,

    /// Render pages in a headless browser (requires the `javascript` feature)
    #[arg(long)]
    javascript: bool,

    /// Print crawl statistics after the link graph
    #[arg(long)]
    stats: bool,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.scan_depth = depth;
    }
    if cli.javascript {
        config.javascript.enabled = true;
    }
    ripple_map::config::validate(&config).context("invalid configuration")?;

    let (root, avoid) = crawl(&config, &cli.url)
        .await
        .with_context(|| format!("failed to crawl {}", cli.url))?;

    println!("DOMAIN: {}\n", root.domain_name);
    println!("Pages graph:");
    print!(
        "{}",
        format_edges(&render_edges(&root, config.crawler.scan_depth))
    );

    if cli.stats {
        println!();
        print_statistics(&CrawlStatistics::collect(&root, &avoid));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_map=info,warn"),
            1 => EnvFilter::new("ripple_map=debug,info"),
            2 => EnvFilter::new("ripple_map=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so the edge list on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
