//! Crawler module for snapshot harvesting
//!
//! This module contains the core harvesting logic, including:
//! - Page acquisition over plain HTTP or a rendered browser tab
//! - HTML parsing for image and link extraction
//! - Frontier ordering and polite delays
//! - Overall crawl coordination

#[cfg(feature = "browser")]
mod browser;
mod coordinator;
mod fetcher;
mod parser;
mod render;
mod scheduler;
mod source;

#[cfg(feature = "browser")]
pub use browser::RenderedFetcher;
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_bytes, fetch_url, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
pub use render::{scroll_until_stable, ScrollTarget};
pub use scheduler::{QueuedUrl, Scheduler};
pub use source::{FetchError, FetchResult, PageSource, ResourceSource};

use crate::config::{validate, Config, FetcherKind};
use crate::output::CrawlStatistics;
use crate::url::OriginScope;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the output directories
/// 2. Build the page source named by `crawler.fetcher`
/// 3. Walk the site from the seed until the frontier is empty
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Harvest ran to completion (individual pages may have failed)
/// * `Err(HarvestError)` - Harvest could not start
pub async fn crawl(config: Config) -> Result<CrawlStatistics, HarvestError> {
    let scope = OriginScope::new(config.crawler.origin_prefix());
    let http = HttpFetcher::new(&config.http, &scope)?;
    let pages = page_source(&config, &http).await?;

    let mut coordinator = Coordinator::new(&config, pages, Box::new(http))?;
    Ok(coordinator.run().await)
}

/// Harvests `seed` with default settings, keeping to `origin_prefix`
///
/// # Example
///
/// ```no_run
/// # async fn run() -> Result<(), archive_harvest::HarvestError> {
/// let stats = archive_harvest::crawler::crawl_site(
///     "https://web.archive.org/web/20240911141314/https://example.org/",
///     "https://web.archive.org/web/20240911141314/https://example.org/",
/// )
/// .await?;
/// println!("{} pages visited", stats.pages_visited());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_site(seed: &str, origin_prefix: &str) -> Result<CrawlStatistics, HarvestError> {
    let config = Config::for_seed(seed, Some(origin_prefix));
    validate(&config)?;
    crawl(config).await
}

async fn page_source(
    config: &Config,
    http: &HttpFetcher,
) -> Result<Box<dyn PageSource>, HarvestError> {
    match config.crawler.fetcher {
        FetcherKind::Http => Ok(Box::new(http.clone())),
        FetcherKind::Rendered => rendered_source(config).await,
    }
}

#[cfg(feature = "browser")]
async fn rendered_source(config: &Config) -> Result<Box<dyn PageSource>, HarvestError> {
    Ok(Box::new(RenderedFetcher::launch(&config.browser).await?))
}

#[cfg(not(feature = "browser"))]
async fn rendered_source(_config: &Config) -> Result<Box<dyn PageSource>, HarvestError> {
    Err(HarvestError::Browser(
        "rendered fetching requires building with the `browser` feature".to_string(),
    ))
}
