//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Page sources (plain HTTP, or a headless browser with the `javascript` feature)
//! - Jittered fetching with bounded retries
//! - HTML parsing and same-domain link extraction
//! - Level-by-level crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod page;
mod parser;
#[cfg(feature = "javascript")]
mod render;
mod source;

pub use coordinator::Coordinator;
pub use extractor::{extract_links, group_by_path, select_domain_links};
pub use fetcher::{FetchOutcome, Fetcher, Jitter};
pub use page::{Page, PathGroup};
pub use parser::{Document, DocumentLink};
#[cfg(feature = "javascript")]
pub use render::RenderSource;
pub use source::{build_http_client, build_source, HttpSource, PageSource};

use crate::config::Config;
use crate::state::AvoidSet;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the page source the configuration selects
/// 2. Fetch and expand the root page
/// 3. Fetch and expand each following level up to the scan depth
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `root_url` - The site entry point, e.g. `http://news.ycombinator.com`
///
/// # Returns
///
/// * `Ok((Page, Arc<AvoidSet>))` - The crawl tree and the paths given up on
/// * `Err(RippleError)` - The source could not be built or the URL is unusable
pub async fn crawl(config: &Config, root_url: &str) -> crate::Result<(Page, Arc<AvoidSet>)> {
    let coordinator = Coordinator::from_config(config).await?;
    let avoid = Arc::new(AvoidSet::new());
    let root = coordinator.crawl_with(root_url, Arc::clone(&avoid)).await?;
    Ok((root, avoid))
}
