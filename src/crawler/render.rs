//! Headless browser page source
//!
//! Only compiled with the `javascript` feature. Pages are opened in a
//! headless Chromium, given a fixed settle time for scripts to run, and the
//! resulting DOM is serialized back to HTML.

use crate::crawler::source::PageSource;
use crate::RippleError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Page source backed by a headless Chromium instance
pub struct RenderSource {
    browser: Browser,
    handler_task: JoinHandle<()>,
    settle: Duration,
}

impl RenderSource {
    /// Launches the browser and starts driving its event handler
    pub async fn launch(settle: Duration) -> Result<Self, RippleError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|message| RippleError::Render {
                url: String::new(),
                message,
            })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| RippleError::Render {
                    url: String::new(),
                    message: e.to_string(),
                })?;

        // The handler stream must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!("Headless browser launched (settle time {:?})", settle);

        Ok(Self {
            browser,
            handler_task,
            settle,
        })
    }

    /// Waits for the navigation, rejects non-2xx responses, then serializes
    /// the settled DOM
    async fn render(&self, page: &Page, url: &str) -> Result<String, RippleError> {
        let request = page
            .wait_for_navigation_response()
            .await
            .map_err(|e| render_error(url, e))?;

        let status = request.and_then(|request| request.response.as_ref().map(|r| r.status));
        check_status(url, status)?;

        tokio::time::sleep(self.settle).await;

        page.content().await.map_err(|e| render_error(url, e))
    }
}

/// Accepts a navigation unless the browser saw a non-2xx status
///
/// Navigations that report no response (cached or synthetic documents) are
/// accepted.
fn check_status(url: &str, status: Option<i64>) -> Result<(), RippleError> {
    match status {
        Some(code) if !(200..300).contains(&code) => Err(RippleError::Status {
            url: url.to_string(),
            status: u16::try_from(code).unwrap_or(0),
        }),
        _ => Ok(()),
    }
}

fn render_error(url: &str, error: CdpError) -> RippleError {
    RippleError::Render {
        url: url.to_string(),
        message: error.to_string(),
    }
}

#[async_trait]
impl PageSource for RenderSource {
    async fn get(&self, url: &str) -> Result<String, RippleError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| render_error(url, e))?;

        let html = self.render(&page, url).await;
        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close render page for {}: {}", url, e);
        }
        html
    }

    fn kind(&self) -> &'static str {
        "render"
    }
}

impl Drop for RenderSource {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
