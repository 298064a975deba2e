use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// URL paths that exhausted their retry budget during one crawl
///
/// The set is append-only and shared by every fetch task of a crawl through an
/// `Arc`. A fresh set is created per crawl, so independent crawls never see
/// each other's failures.
///
/// A poisoned lock is recovered rather than propagated: the worst outcome of a
/// half-finished insert is a missing or duplicate entry, which only costs an
/// extra fetch attempt.
#[derive(Debug, Default)]
pub struct AvoidSet {
    paths: RwLock<HashSet<String>>,
}

impl AvoidSet {
    /// Creates an empty avoid-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a path; returns true if it was not already present
    pub fn insert(&self, path: impl Into<String>) -> bool {
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into())
    }

    /// Returns true if fetches for this path should be skipped
    pub fn contains(&self, path: &str) -> bool {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the recorded paths in sorted order
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}
