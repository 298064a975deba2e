use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent with every request, so that trivial bot
/// blocking does not reject the crawler.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/63.0.3239.132 Safari/537.36 QIHU 360SE";

/// Main configuration structure for Ripple-Map
///
/// Every section and key is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub javascript: JavascriptConfig,
}

/// How child pages are derived from the path groups of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChildPolicy {
    /// One child per path group, built from the first link seen for that path
    #[default]
    PerPath,
    /// One child per distinct link; same-path links become siblings
    PerLink,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of link-following levels below the root
    #[serde(rename = "scan-depth")]
    pub scan_depth: u32,

    /// Fetch attempts per page before its path is avoided
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Maximum number of requests in flight at once
    #[serde(rename = "max-workers")]
    pub max_workers: u32,

    /// Lower bound of the pre-request jitter (milliseconds)
    #[serde(rename = "jitter-min-ms")]
    pub jitter_min_ms: u64,

    /// Upper bound (exclusive) of the pre-request jitter (milliseconds)
    #[serde(rename = "jitter-max-ms")]
    pub jitter_max_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "child-policy")]
    pub child_policy: ChildPolicy,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            scan_depth: 2,
            max_attempts: 3,
            max_workers: 4,
            jitter_min_ms: 250,
            jitter_max_ms: 2000,
            request_timeout_secs: 30,
            child_policy: ChildPolicy::PerPath,
        }
    }
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Headless rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JavascriptConfig {
    /// Render pages in a headless browser instead of plain GET requests
    pub enabled: bool,

    /// Time to let scripts settle before the HTML is read (milliseconds)
    #[serde(rename = "render-time-ms")]
    pub render_time_ms: u64,
}

impl JavascriptConfig {
    pub fn render_time(&self) -> Duration {
        Duration::from_millis(self.render_time_ms)
    }
}

impl Default for JavascriptConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            render_time_ms: 3000,
        }
    }
}
