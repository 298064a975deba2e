//! Page sources
//!
//! A [`PageSource`] turns a URL into HTML. The fetcher only sees this trait;
//! whether pages come from plain GET requests or from a headless browser is
//! decided once, from configuration, by [`build_source`].

use crate::config::{Config, UserAgentConfig};
use crate::{ConfigError, RippleError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;

/// Strategy for acquiring the HTML of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` and returns its body on a successful response
    ///
    /// Any failure (non-2xx status, connection error, timeout, redirect
    /// overflow, render failure) is an `Err`; the caller decides whether to
    /// retry.
    async fn get(&self, url: &str) -> Result<String, RippleError>;

    /// Short name used in log lines
    fn kind(&self) -> &'static str;
}

/// Builds an HTTP client with the browser-like header set
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use ripple_map::config::UserAgentConfig;
/// use ripple_map::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(config.value.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Plain HTTP GET source
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the source from configuration
    pub fn from_config(config: &Config) -> Result<Self, RippleError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())
            .map_err(|source| RippleError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn get(&self, url: &str) -> Result<String, RippleError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RippleError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Decoded with the charset declared in Content-Type
        response.text().await.map_err(|e| classify_error(url, e))
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}

/// Maps a transport error onto the crate's error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> RippleError {
    if error.is_timeout() {
        RippleError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        RippleError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        RippleError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Selects the page source the configuration asks for
pub async fn build_source(config: &Config) -> Result<Arc<dyn PageSource>, RippleError> {
    if config.javascript.enabled {
        return build_render_source(config).await;
    }

    Ok(Arc::new(HttpSource::from_config(config)?))
}

#[cfg(feature = "javascript")]
async fn build_render_source(config: &Config) -> Result<Arc<dyn PageSource>, RippleError> {
    let source = crate::crawler::render::RenderSource::launch(config.javascript.render_time()).await?;
    Ok(Arc::new(source))
}

#[cfg(not(feature = "javascript"))]
async fn build_render_source(_config: &Config) -> Result<Arc<dyn PageSource>, RippleError> {
    Err(ConfigError::Unsupported(
        "javascript rendering requires building with the `javascript` feature".to_string(),
    )
    .into())
}
