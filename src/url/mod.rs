//! URL handling module for Ripple-Map
//!
//! This module decides which links are worth following: it classifies
//! resource links, normalizes scheme/`www.` variants, and derives the
//! domain identity used to keep the crawl on a single site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{derive_domain_name, url_path};
pub use normalize::{canonical_root, normalize};

/// Substrings that mark a link as a non-page asset
///
/// Matching is by substring anywhere in the link, not by extension, so a link
/// such as `a.jpg?x=1` or `/static.css/v2` is still treated as a resource.
pub const RESOURCE_SUFFIXES: &[&str] = &[
    ".js", ".css", ".jpg", ".gif", ".png", ".mp4", ".ico", ".svg", ".json", ".xml",
];

/// Returns true if the link most likely points at a resource rather than a page
///
/// # Examples
///
/// ```
/// use ripple_map::url::is_resource;
///
/// assert!(is_resource("a.jpg?x=1"));
/// assert!(!is_resource("/about"));
/// ```
pub fn is_resource(link: &str) -> bool {
    RESOURCE_SUFFIXES.iter().any(|suffix| link.contains(suffix))
}

/// Returns true if a normalized link belongs to the crawled domain
///
/// A link qualifies when it carries an `http` scheme marker, contains the
/// domain's short name, and contains `http` exactly once. The last rule drops
/// wrappers that embed a second URL, e.g. `http://ex.com/go?u=http://ex.com/x`.
pub fn is_crawlable_link(link: &str, domain_name: &str) -> bool {
    link.contains("http") && link.contains(domain_name) && link.matches("http").count() == 1
}
