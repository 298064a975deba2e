//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `AvoidSet`: URL paths that permanently failed to fetch within the current crawl

mod avoid_set;

// Re-export main types
pub use avoid_set::AvoidSet;
