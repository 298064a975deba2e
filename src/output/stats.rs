//! Statistics over a finished crawl tree
//!
//! This module summarises a crawl tree and its avoid-set for display after
//! the edge list.

use crate::crawler::Page;
use crate::state::AvoidSet;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of pages in the tree, fetched or not
    pub total_pages: u64,

    /// Pages that were fetched successfully
    pub fetched_pages: u64,

    /// Pages never fetched (failed, skipped, or below the scan depth)
    pub unfetched_pages: u64,

    /// Deepest level with a fetched page (the root is level 0)
    pub deepest_fetched_level: u32,

    /// Same-domain links found across all fetched pages
    pub total_links: u64,

    /// Path groups found across all fetched pages
    pub path_groups: u64,

    /// Paths that exhausted their retries, sorted
    pub avoided_paths: Vec<String>,
}

impl CrawlStatistics {
    /// Walks the tree and gathers its statistics
    pub fn collect(root: &Page, avoid: &AvoidSet) -> Self {
        let mut stats = Self {
            avoided_paths: avoid.paths(),
            ..Self::default()
        };
        stats.visit(root, 0);
        stats
    }

    fn visit(&mut self, page: &Page, level: u32) {
        self.total_pages += 1;

        if page.is_fetched() {
            self.fetched_pages += 1;
            self.deepest_fetched_level = self.deepest_fetched_level.max(level);
            self.total_links += page.links.len() as u64;
            self.path_groups += page.links_by_path.len() as u64;
        } else {
            self.unfetched_pages += 1;
        }

        for child in &page.children {
            self.visit(child, level + 1);
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages discovered: {}", stats.total_pages);
    println!("  Pages fetched: {}", stats.fetched_pages);
    println!("  Pages not fetched: {}", stats.unfetched_pages);
    println!("  Deepest fetched level: {}", stats.deepest_fetched_level);
    println!("  Same-domain links found: {}", stats.total_links);
    println!("  Path groups: {}", stats.path_groups);
    println!();

    if !stats.avoided_paths.is_empty() {
        println!("Avoided Paths ({}):", stats.avoided_paths.len());
        for path in &stats.avoided_paths {
            println!("  - {}", path);
        }
        println!();
    }

    let success_rate = if stats.total_pages > 0 {
        (stats.fetched_pages as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Fetch Rate: {:.1}% ({} / {} pages fetched)",
        success_rate, stats.fetched_pages, stats.total_pages
    );
}
