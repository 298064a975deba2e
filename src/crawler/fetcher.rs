//! Page fetcher implementation
//!
//! This module acquires the document of a single page:
//! - Skipping non-root pages that point back at the domain root
//! - Skipping pages whose path is in the crawl's avoid-set
//! - Jittering every attempt to avoid hammering the site
//! - Retrying failures up to a fixed number of attempts
//! - Recording exhausted paths in the avoid-set

use crate::config::CrawlerConfig;
use crate::crawler::page::Page;
use crate::crawler::parser::Document;
use crate::crawler::source::PageSource;
use crate::state::AvoidSet;
use crate::url::url_path;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Result of a fetch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page document was stored
    Fetched {
        /// Attempt that succeeded (1-based)
        attempts: u32,
    },

    /// Non-root page pointing at the domain root; never fetched
    SkippedSelfReference,

    /// The page's path already exhausted its retries in this crawl
    SkippedAvoided,

    /// Every attempt failed; the path was added to the avoid-set
    Exhausted {
        /// Number of attempts made
        attempts: u32,
    },
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }
}

/// Uniform random delay taken before every attempt
#[derive(Debug, Clone, Copy)]
pub struct Jitter {
    min: Duration,
    max: Duration,
}

impl Jitter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Samples a delay from `[min, max)`; `min` when the range is empty
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }
}

/// Retry-bounded, jittered page fetcher
///
/// The fetcher holds no per-crawl state: the avoid-set is passed to every
/// call, so one fetcher can serve several independent crawls.
pub struct Fetcher {
    source: Arc<dyn PageSource>,
    workers: Arc<Semaphore>,
    max_attempts: u32,
    jitter: Jitter,
}

impl Fetcher {
    /// Creates a fetcher over the given source
    ///
    /// # Arguments
    ///
    /// * `source` - Where page HTML comes from
    /// * `config` - Attempts, worker count and jitter bounds
    pub fn new(source: Arc<dyn PageSource>, config: &CrawlerConfig) -> Self {
        Self {
            source,
            workers: Arc::new(Semaphore::new(config.max_workers.max(1) as usize)),
            max_attempts: config.max_attempts.max(1),
            jitter: Jitter::new(
                Duration::from_millis(config.jitter_min_ms),
                Duration::from_millis(config.jitter_max_ms),
            ),
        }
    }

    /// Fetches a page's document
    ///
    /// # Fetch Flow
    ///
    /// 1. Non-root page whose URL is the domain root → `SkippedSelfReference`
    /// 2. Page path in the avoid-set → `SkippedAvoided`
    /// 3. For each attempt: sleep a jitter, take a worker permit, request
    ///    - success → parse, store on `page.document`, `Fetched`
    ///    - failure → log and try again
    /// 4. All attempts failed → record the path, `Exhausted`
    ///
    /// Only `page.document` is written.
    pub async fn fetch(&self, page: &mut Page, avoid: &AvoidSet) -> FetchOutcome {
        page.document = None;

        if !page.is_root && page.url == page.domain_root_url {
            tracing::info!("Skipping: {} (domain root)", page.url);
            return FetchOutcome::SkippedSelfReference;
        }

        let path = url_path(&page.url).unwrap_or_else(|| page.url.clone());
        if avoid.contains(&path) {
            tracing::info!("Skipping: {} (avoided path {})", page.url, path);
            return FetchOutcome::SkippedAvoided;
        }

        tracing::info!("Processing: {}", page.url);

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.jitter.sample()).await;

            let result = match self.workers.acquire().await {
                Ok(_permit) => self.source.get(&page.url).await,
                // The semaphore is never closed
                Err(_) => break,
            };

            match result {
                Ok(body) => {
                    page.document = Some(Document::parse(&body));
                    tracing::debug!(
                        "Fetched {} via {} on attempt {}",
                        page.url,
                        self.source.kind(),
                        attempt
                    );
                    return FetchOutcome::Fetched { attempts: attempt };
                }
                Err(e) => {
                    tracing::warn!(
                        "Error while requesting page {} (attempt {}/{}): {}",
                        page.url,
                        attempt,
                        self.max_attempts,
                        e
                    );
                }
            }
        }

        avoid.insert(path.clone());
        tracing::warn!(
            "Giving up on {} after {} attempts; avoiding path {}",
            page.url,
            self.max_attempts,
            path
        );
        FetchOutcome::Exhausted {
            attempts: self.max_attempts,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::RippleError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves canned HTML per URL; unknown URLs fail with 404
    ///
    /// `failures` makes a URL fail that many times before succeeding.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        pages: HashMap<String, String>,
        failures: Mutex<HashMap<String, usize>>,
        pub(crate) calls: AtomicUsize,
        pub(crate) requested: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        pub(crate) fn failing(self, url: &str, times: usize) -> Self {
            self.failures
                .lock()
                .unwrap()
                .insert(url.to_string(), times);
            self
        }

        pub(crate) fn calls_for(&self, url: &str) -> usize {
            self.requested
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.as_str() == url)
                .count()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn get(&self, url: &str) -> Result<String, RippleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());

            {
                let mut failures = self.failures.lock().unwrap();
                if let Some(remaining) = failures.get_mut(url) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(RippleError::Status {
                            url: url.to_string(),
                            status: 503,
                        });
                    }
                }
            }

            self.pages.get(url).cloned().ok_or(RippleError::Status {
                url: url.to_string(),
                status: 404,
            })
        }

        fn kind(&self) -> &'static str {
            "scripted"
        }
    }

    pub(crate) fn fast_config() -> CrawlerConfig {
        CrawlerConfig {
            jitter_min_ms: 0,
            jitter_max_ms: 1,
            ..CrawlerConfig::default()
        }
    }

    const ROOT: &str = "http://example.com/";

    fn fetcher(source: Arc<ScriptedSource>) -> Fetcher {
        Fetcher::new(source, &fast_config())
    }

    #[test]
    fn test_jitter_within_bounds() {
        let jitter = Jitter::new(Duration::from_millis(250), Duration::from_millis(2000));
        for _ in 0..100 {
            let delay = jitter.sample();
            assert!(delay >= Duration::from_millis(250));
            assert!(delay < Duration::from_millis(2000));
        }
    }

    #[test]
    fn test_empty_jitter_range() {
        let jitter = Jitter::new(Duration::from_millis(5), Duration::from_millis(5));
        assert_eq!(jitter.sample(), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_successful_fetch_stores_document() {
        let source = Arc::new(
            ScriptedSource::new().page("http://example.com/a", "<title>A</title>"),
        );
        let avoid = AvoidSet::new();
        let mut page = Page::new("http://example.com/a", ROOT, "example");

        let outcome = fetcher(source.clone()).fetch(&mut page, &avoid).await;

        assert_eq!(outcome, FetchOutcome::Fetched { attempts: 1 });
        assert_eq!(page.document.unwrap().title, Some("A".to_string()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_root_is_fetched_even_though_it_is_the_domain_root() {
        let source = Arc::new(ScriptedSource::new().page(ROOT, "<title>Home</title>"));
        let mut page = Page::root(ROOT, ROOT, "example");

        let outcome = fetcher(source).fetch(&mut page, &AvoidSet::new()).await;
        assert!(outcome.is_fetched());
    }

    #[tokio::test]
    async fn test_non_root_self_reference_skipped() {
        let source = Arc::new(ScriptedSource::new().page(ROOT, "<title>Home</title>"));
        let mut page = Page::new(ROOT, ROOT, "example");

        let outcome = fetcher(source.clone()).fetch(&mut page, &AvoidSet::new()).await;

        assert_eq!(outcome, FetchOutcome::SkippedSelfReference);
        assert!(page.document.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_avoided_path_skipped_without_request() {
        let source = Arc::new(
            ScriptedSource::new().page("http://example.com/item?id=2", "<title>2</title>"),
        );
        let avoid = AvoidSet::new();
        avoid.insert("/item");
        let mut page = Page::new("http://example.com/item?id=2", ROOT, "example");

        let outcome = fetcher(source.clone()).fetch(&mut page, &avoid).await;

        assert_eq!(outcome, FetchOutcome::SkippedAvoided);
        assert!(page.document.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let source = Arc::new(
            ScriptedSource::new()
                .page("http://example.com/flaky", "<title>ok</title>")
                .failing("http://example.com/flaky", 2),
        );
        let avoid = AvoidSet::new();
        let mut page = Page::new("http://example.com/flaky", ROOT, "example");

        let outcome = fetcher(source.clone()).fetch(&mut page, &avoid).await;

        assert_eq!(outcome, FetchOutcome::Fetched { attempts: 3 });
        assert!(page.is_fetched());
        assert!(avoid.is_empty());
        assert_eq!(source.calls_for("http://example.com/flaky"), 3);
    }

    #[tokio::test]
    async fn test_exhausted_path_is_avoided_for_later_pages() {
        let source = Arc::new(ScriptedSource::new());
        let avoid = AvoidSet::new();
        let fetcher = fetcher(source.clone());

        let mut first = Page::new("http://example.com/broken?v=1", ROOT, "example");
        let outcome = fetcher.fetch(&mut first, &avoid).await;

        assert_eq!(outcome, FetchOutcome::Exhausted { attempts: 3 });
        assert!(first.document.is_none());
        assert!(avoid.contains("/broken"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        // Same path, different query: short-circuited
        let mut second = Page::new("http://example.com/broken?v=2", ROOT, "example");
        let outcome = fetcher.fetch(&mut second, &avoid).await;

        assert_eq!(outcome, FetchOutcome::SkippedAvoided);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_custom_attempt_budget() {
        let source = Arc::new(ScriptedSource::new());
        let config = CrawlerConfig {
            max_attempts: 5,
            ..fast_config()
        };
        let fetcher = Fetcher::new(source.clone(), &config);
        let mut page = Page::new("http://example.com/gone", ROOT, "example");

        let outcome = fetcher.fetch(&mut page, &AvoidSet::new()).await;

        assert_eq!(outcome, FetchOutcome::Exhausted { attempts: 5 });
        assert_eq!(source.calls.load(Ordering::SeqCst), 5);
    }
}
