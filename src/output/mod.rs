//! Output module for reporting crawl results
//!
//! This module handles:
//! - Rendering the parent → child edge list of a crawl tree
//! - Summarising crawl statistics

mod graph;
pub mod stats;

pub use graph::{format_edges, render_edges, Edge};
pub use stats::{print_statistics, CrawlStatistics};
