//! Link extraction and grouping
//!
//! Turns the document of a fetched page into that page's same-domain links,
//! its path groups, and its child pages.

use crate::config::ChildPolicy;
use crate::crawler::page::{Page, PathGroup};
use crate::crawler::parser::DocumentLink;
use crate::url::{is_crawlable_link, is_resource, normalize, url_path};
use std::collections::HashSet;
use url::Url;

/// Populates `links`, `links_by_path` and `children` of a fetched page
///
/// Does nothing if the page has no document. Children copy the domain
/// identity the page carries, which is the crawl root's.
pub fn extract_links(page: &mut Page, policy: ChildPolicy) {
    let Some(document) = page.document.as_mut() else {
        tracing::debug!("No document for {}, nothing to extract", page.url);
        return;
    };

    let base = match Url::parse(&page.domain_root_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!(
                "Cannot resolve links of {} against {}: {}",
                page.url,
                page.domain_root_url,
                e
            );
            return;
        }
    };

    document.make_links_absolute(&base, true);
    let mut links = select_domain_links(document.iter_links(), &page.domain_name);

    // The root must not list itself as a child
    if page.is_root {
        if let Some(index) = links.iter().position(|l| *l == page.domain_root_url) {
            links.remove(index);
        }
    }

    let groups = group_by_path(&links);
    let children: Vec<Page> = match policy {
        ChildPolicy::PerPath => groups
            .iter()
            .filter_map(|group| group.links.first())
            .map(|link| page.child(link.clone()))
            .collect(),
        ChildPolicy::PerLink => groups
            .iter()
            .flat_map(|group| group.links.iter())
            .map(|link| page.child(link.clone()))
            .collect(),
    };

    tracing::debug!(
        "Extracted {} links in {} path groups from {}",
        links.len(),
        groups.len(),
        page.url
    );

    page.links = links;
    page.links_by_path = groups;
    page.children = children;
}

/// Filters absolute document links down to distinct same-domain page links
///
/// # Filter Rules
///
/// - Only `href` attributes (not `src`, `action`, `style`, ...)
/// - Normalized (`https` → `http`, `www.` stripped)
/// - Not a resource link
/// - Crawlable for `domain_name` (one `http`, contains the domain name)
/// - First occurrence wins; order is preserved
pub fn select_domain_links<'a>(
    links: impl IntoIterator<Item = &'a DocumentLink>,
    domain_name: &str,
) -> Vec<String> {
    let mut seen = HashSet::new();

    links
        .into_iter()
        .filter(|entry| entry.attribute == "href")
        .map(|entry| normalize(&entry.link))
        .filter(|link| !is_resource(link))
        .filter(|link| is_crawlable_link(link, domain_name))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Groups links by URL path
///
/// Groups appear in the order their path was first seen; each group keeps
/// every distinct link with that path. Links that do not parse are dropped.
pub fn group_by_path(links: &[String]) -> Vec<PathGroup> {
    let mut groups: Vec<PathGroup> = Vec::new();

    for link in links {
        let Some(path) = url_path(link) else {
            tracing::debug!("Dropping unparseable link {}", link);
            continue;
        };

        match groups.iter_mut().find(|group| group.path == path) {
            Some(group) => {
                if !group.links.contains(link) {
                    group.links.push(link.clone());
                }
            }
            None => groups.push(PathGroup {
                path,
                links: vec![link.clone()],
            }),
        }
    }

    groups
}
