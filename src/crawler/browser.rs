//! Rendered-page fetcher using headless Chrome/Chromium
//!
//! Loads each page in a browser tab, waits for `<body>`, scrolls until the
//! document stops growing and returns the rendered markup. Only compiled
//! with the `browser` feature.

use crate::config::BrowserConfig;
use crate::crawler::render::{scroll_until_stable, ScrollTarget};
use crate::crawler::source::{FetchResult, PageSource};
use crate::HarvestError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Page source that renders pages in a headless browser
pub struct RenderedFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    load_timeout: Duration,
    scroll_pause: Duration,
    max_scrolls: u32,
}

impl RenderedFetcher {
    /// Launches the browser process
    pub async fn launch(config: &BrowserConfig) -> Result<Self, HarvestError> {
        tracing::info!("Launching headless browser for rendered fetches");

        let load_timeout = Duration::from_secs(config.load_timeout_secs);

        let mut builder = ChromeConfig::builder()
            .request_timeout(load_timeout)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--mute-audio");

        if let Some(ref chrome_path) = config.chrome_path {
            builder = builder.chrome_executable(chrome_path);
        }

        let chrome_config = builder
            .build()
            .map_err(|e| HarvestError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| HarvestError::Browser(format!("Failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            load_timeout,
            scroll_pause: Duration::from_millis(config.scroll_pause_ms),
            max_scrolls: config.max_scrolls,
        })
    }

    async fn render(&self, url: &Url) -> Result<(String, String), String> {
        let page = self
            .browser
            .new_page(url.as_str())
            .await
            .map_err(|e| format!("Failed to open tab: {}", e))?;

        let result = self.read_rendered(&page, url).await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }

        result
    }

    async fn read_rendered(&self, page: &Page, url: &Url) -> Result<(String, String), String> {
        tokio::time::timeout(self.load_timeout, page.wait_for_navigation())
            .await
            .map_err(|_| "Navigation timeout".to_string())?
            .map_err(|e| format!("Navigation failed: {}", e))?;

        tokio::time::timeout(self.load_timeout, page.find_element("body"))
            .await
            .map_err(|_| "Timed out waiting for <body>".to_string())?
            .map_err(|e| format!("No <body> in document: {}", e))?;

        let rounds = scroll_until_stable(&TabScroller(page), self.scroll_pause, self.max_scrolls)
            .await?;
        tracing::debug!("Scrolled {} {} times", url, rounds);

        let body = page
            .content()
            .await
            .map_err(|e| format!("Failed to read document: {}", e))?;

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        Ok((final_url, body))
    }
}

impl Drop for RenderedFetcher {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl PageSource for RenderedFetcher {
    async fn fetch_page(&self, url: &Url) -> FetchResult {
        match self.render(url).await {
            // The browser does not expose the document status; a loaded document counts as 200
            Ok((final_url, body)) => FetchResult::Success {
                final_url,
                status_code: 200,
                body,
            },
            Err(error) => FetchResult::NetworkError { error },
        }
    }

    fn name(&self) -> &'static str {
        "rendered"
    }
}

struct TabScroller<'a>(&'a Page);

#[async_trait]
impl<'a> ScrollTarget for TabScroller<'a> {
    async fn scroll_height(&self) -> Result<i64, String> {
        self.0
            .evaluate("document.body.scrollHeight")
            .await
            .map_err(|e| e.to_string())?
            .into_value::<i64>()
            .map_err(|e| e.to_string())
    }

    async fn scroll_to_bottom(&self) -> Result<(), String> {
        self.0
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
