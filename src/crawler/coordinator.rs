//! Crawler coordinator - main crawl orchestration logic
//!
//! This module builds the page tree level by level:
//! - The root is fetched and expanded inline
//! - Every following level is one task group holding a fetch+extract task
//!   per child of the pages expanded at the previous level
//! - A level is joined completely before the next one is spawned
//! - Pages below the configured depth are created but never fetched

use crate::config::{ChildPolicy, Config, CrawlerConfig};
use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::page::Page;
use crate::crawler::source::{build_source, PageSource};
use crate::state::AvoidSet;
use crate::url::{canonical_root, derive_domain_name};
use crate::{RippleError, UrlError};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<Fetcher>,
    scan_depth: u32,
    child_policy: ChildPolicy,
}

impl Coordinator {
    /// Creates a coordinator over an explicit page source
    pub fn new(config: &CrawlerConfig, source: Arc<dyn PageSource>) -> Self {
        Self {
            fetcher: Arc::new(Fetcher::new(source, config)),
            scan_depth: config.scan_depth,
            child_policy: config.child_policy,
        }
    }

    /// Creates a coordinator with the page source the configuration selects
    pub async fn from_config(config: &Config) -> Result<Self, RippleError> {
        let source = build_source(config).await?;
        Ok(Self::new(&config.crawler, source))
    }

    /// Crawls a site from `root_url` with a fresh avoid-set
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The root page, expanded to the configured depth
    /// * `Err(RippleError)` - The root URL is unusable
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ripple_map::config::Config;
    /// use ripple_map::crawler::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let coordinator = Coordinator::from_config(&Config::default()).await?;
    /// let root = coordinator.crawl("http://news.ycombinator.com").await?;
    /// println!("{} pages discovered", root.count_pages());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, root_url: &str) -> Result<Page, RippleError> {
        self.crawl_with(root_url, Arc::new(AvoidSet::new())).await
    }

    /// Crawls a site using the given avoid-set
    ///
    /// Callers that want to inspect which paths were given up on keep a clone
    /// of the `Arc`.
    pub async fn crawl_with(
        &self,
        root_url: &str,
        avoid: Arc<AvoidSet>,
    ) -> Result<Page, RippleError> {
        let parsed = Url::parse(root_url.trim())?;
        let domain_name = derive_domain_name(&parsed).ok_or(UrlError::MissingDomain)?;
        let domain_root_url = canonical_root(parsed.as_str())?;

        tracing::info!("Crawling {} (domain: {})", root_url, domain_name);
        let start_time = Instant::now();

        let mut root = Page::root(root_url.trim(), domain_root_url, domain_name);
        sync_page(&self.fetcher, &mut root, &avoid, self.child_policy).await;

        // Paths (child indices from the root) of pages whose children are
        // fetched at the next level
        let mut parents: Vec<Vec<usize>> = if root.is_fetched() {
            vec![Vec::new()]
        } else {
            Vec::new()
        };

        for level in 1..=self.scan_depth {
            if parents.is_empty() {
                break;
            }
            parents = self.sync_level(&mut root, &parents, &avoid).await;
            tracing::info!(
                "Level {}/{} complete ({} pages to expand, {} paths avoided)",
                level,
                self.scan_depth,
                parents.len(),
                avoid.len()
            );
        }

        tracing::info!(
            "Crawl completed: {} pages discovered in {:?}",
            root.count_pages(),
            start_time.elapsed()
        );

        Ok(root)
    }

    /// Fetches and expands every child of `parents` concurrently
    ///
    /// Each child is moved into its own task and moved back into its parent,
    /// in its original position, once the whole level has been joined.
    /// Returns the paths of the children that were fetched.
    async fn sync_level(
        &self,
        root: &mut Page,
        parents: &[Vec<usize>],
        avoid: &Arc<AvoidSet>,
    ) -> Vec<Vec<usize>> {
        let mut tasks = JoinSet::new();
        let mut child_counts = Vec::with_capacity(parents.len());

        for (slot, path) in parents.iter().enumerate() {
            let children = match root.descendant_mut(path) {
                Some(parent) => std::mem::take(&mut parent.children),
                None => Vec::new(),
            };
            child_counts.push(children.len());

            for (index, mut child) in children.into_iter().enumerate() {
                let fetcher = Arc::clone(&self.fetcher);
                let avoid = Arc::clone(avoid);
                let policy = self.child_policy;
                tasks.spawn(async move {
                    sync_page(&fetcher, &mut child, &avoid, policy).await;
                    (slot, index, child)
                });
            }
        }

        let mut returned: Vec<Vec<(usize, Page)>> = child_counts
            .iter()
            .map(|count| Vec::with_capacity(*count))
            .collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, index, child)) => returned[slot].push((index, child)),
                Err(e) => tracing::error!("Page task failed: {}", e),
            }
        }

        let mut next_parents = Vec::new();
        for (path, mut children) in parents.iter().zip(returned) {
            children.sort_by_key(|(index, _)| *index);

            let Some(parent) = root.descendant_mut(path) else {
                continue;
            };
            parent.children = children.into_iter().map(|(_, child)| child).collect();

            for (position, child) in parent.children.iter().enumerate() {
                if child.is_fetched() && !child.children.is_empty() {
                    let mut child_path = path.clone();
                    child_path.push(position);
                    next_parents.push(child_path);
                }
            }
        }

        next_parents
    }
}

/// Fetches a page and, if that produced a document, extracts its links
async fn sync_page(fetcher: &Fetcher, page: &mut Page, avoid: &AvoidSet, policy: ChildPolicy) {
    let outcome = fetcher.fetch(page, avoid).await;
    if let FetchOutcome::Fetched { .. } = outcome {
        extract_links(page, policy);
    }
}
