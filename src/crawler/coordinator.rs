//! Crawler coordinator - main harvest orchestration logic
//!
//! This module contains the crawl loop that ties together:
//! - The visited-page and visited-resource sets
//! - The frontier and polite delays
//! - Fetching, parsing and persisting pages
//! - Downloading embedded resources
//!
//! Work is strictly sequential: one request is in flight at a time, and a
//! failure only ever drops the page or resource it belongs to.

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::{QueuedUrl, Scheduler};
use crate::crawler::source::{FetchResult, PageSource, ResourceSource};
use crate::output::CrawlStatistics;
use crate::state::{PageState, ResourceState};
use crate::storage::{FileStorage, PageRecord, ResourceRecord, Storage};
use crate::url::{
    fallback_resource_name, fetch_target, page_key, parse_http_url, resource_file_name,
    OriginScope,
};
use crate::HarvestError;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    seed: Url,
    scope: OriginScope,
    pages: Box<dyn PageSource>,
    resources: Box<dyn ResourceSource>,
    storage: Box<dyn Storage + Send>,
    scheduler: Scheduler,
    /// Page keys that have been claimed for fetching
    visited_pages: HashSet<String>,
    /// Absolute resource addresses already handled
    visited_resources: HashSet<String>,
    page_states: HashMap<String, PageState>,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a coordinator writing to the directories named in the config
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `pages` - How page markup is acquired
    /// * `resources` - How resource bytes are downloaded
    pub fn new(
        config: &Config,
        pages: Box<dyn PageSource>,
        resources: Box<dyn ResourceSource>,
    ) -> Result<Self, HarvestError> {
        let storage = FileStorage::new(&config.output)?;
        Self::with_storage(config, pages, resources, Box::new(storage))
    }

    /// Creates a coordinator over an arbitrary storage backend
    pub fn with_storage(
        config: &Config,
        pages: Box<dyn PageSource>,
        resources: Box<dyn ResourceSource>,
        storage: Box<dyn Storage + Send>,
    ) -> Result<Self, HarvestError> {
        let seed = parse_http_url(&config.crawler.seed)?;
        let scope = OriginScope::new(config.crawler.origin_prefix());

        Ok(Self {
            seed,
            scope,
            pages,
            resources,
            storage,
            scheduler: Scheduler::new(&config.crawler),
            visited_pages: HashSet::new(),
            visited_resources: HashSet::new(),
            page_states: HashMap::new(),
            stats: CrawlStatistics::new(),
        })
    }

    /// Runs the crawl loop until the frontier is exhausted
    ///
    /// Seeds the frontier with the configured seed, then repeatedly:
    /// 1. Pops the next URL
    /// 2. Skips it if visited or out of scope
    /// 3. Fetches, persists and parses the page
    /// 4. Downloads new resources
    /// 5. Pushes unvisited in-scope links
    pub async fn run(&mut self) -> CrawlStatistics {
        tracing::info!(
            "Starting harvest at {} (scope: {}, fetcher: {})",
            self.seed,
            self.scope.prefix(),
            self.pages.name()
        );

        let start_time = Instant::now();
        self.scheduler.add_to_frontier(QueuedUrl {
            url: fetch_target(&self.seed),
            key: page_key(&self.seed),
        });

        let mut pages_crawled: u64 = 0;

        while let Some(queued) = self.scheduler.next_url() {
            if self.process_url(queued).await.is_none() {
                continue;
            }

            pages_crawled += 1;

            if pages_crawled % 10 == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    pages_crawled,
                    self.scheduler.frontier_size(),
                    pages_crawled as f64 / elapsed.as_secs_f64()
                );
            }
        }

        self.stats.duration = Some(start_time.elapsed());

        tracing::info!(
            "Harvest complete: {} pages visited, {} saved, {} resources downloaded in {:?}",
            pages_crawled,
            self.stats.pages(PageState::Persisted),
            self.stats.resources(ResourceState::Downloaded),
            start_time.elapsed()
        );

        self.stats.clone()
    }

    /// Processes a single URL
    ///
    /// Returns `None` when the URL was skipped without any side effect,
    /// otherwise the terminal state of the page.
    async fn process_url(&mut self, queued: QueuedUrl) -> Option<PageState> {
        if self.visited_pages.contains(&queued.key) {
            tracing::debug!("Skipping already visited URL: {}", queued.key);
            return None;
        }

        if !self.scope.contains(&queued.key) {
            tracing::debug!("Skipping external URL: {}", queued.key);
            return None;
        }

        // Claimed before the request so a page linking to itself cannot requeue
        self.visited_pages.insert(queued.key.clone());
        self.set_page_state(&queued.key, PageState::InProgress);

        let state = self.visit_page(&queued).await;

        self.set_page_state(&queued.key, state);
        self.stats.record_page(state);
        Some(state)
    }

    async fn visit_page(&mut self, queued: &QueuedUrl) -> PageState {
        let url_str = queued.url.as_str();

        self.scheduler.wait_before_page().await;
        tracing::info!("Visiting: {}", url_str);

        let body = match self.pages.fetch_page(&queued.url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                if final_url != url_str {
                    tracing::debug!("{} answered from {} ({})", url_str, final_url, status_code);
                }
                body
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to process {}: HTTP {}", url_str, status_code);
                return PageState::Failed;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to process {}: {}", url_str, error);
                return PageState::Failed;
            }
        };

        let parsed = parse_html(&body, &queued.url);
        let page = PageRecord {
            url: queued.url.clone(),
            markup: body,
            resources: parsed.images,
            links: parsed.links,
        };

        match self.storage.persist_page(&page) {
            Ok(path) => tracing::info!("Saved HTML to {}", path.display()),
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", url_str, e);
                return PageState::Failed;
            }
        }

        tracing::info!("Found {} images on {}", page.resources.len(), url_str);
        self.handle_resources(&page.resources).await;

        tracing::info!("Found {} links on {}", page.links.len(), url_str);
        self.handle_discovered_links(&page.links);

        PageState::Persisted
    }

    /// Downloads every resource of a page that has not been handled yet
    async fn handle_resources(&mut self, resources: &[String]) {
        for address in resources {
            let state = self.handle_resource(address).await;
            self.stats.record_resource(state);
        }
    }

    async fn handle_resource(&mut self, address: &str) -> ResourceState {
        if self.visited_resources.contains(address) {
            tracing::debug!("Skipping duplicate image: {}", address);
            return ResourceState::SkippedDuplicate;
        }

        let url = match Url::parse(address) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", address, e);
                self.visited_resources.insert(address.to_string());
                return ResourceState::Failed;
            }
        };

        let name = resource_file_name(&url)
            .unwrap_or_else(|| fallback_resource_name(chrono::Utc::now().timestamp_millis()));

        self.visited_resources.insert(address.to_string());

        if self.storage.resource_exists(&name) {
            tracing::debug!("Skipping {}, {} already exists", address, name);
            return ResourceState::SkippedExisting;
        }

        self.scheduler.wait_before_resource().await;

        let bytes = match self.resources.fetch_resource(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", address, e);
                return ResourceState::Failed;
            }
        };

        let record = ResourceRecord { url, name, bytes };
        match self.storage.persist_resource(&record) {
            Ok(_) => {
                tracing::info!("Downloaded {} -> {}", address, record.name);
                ResourceState::Downloaded
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", address, e);
                ResourceState::Failed
            }
        }
    }

    /// Queues in-scope links that have not been visited
    fn handle_discovered_links(&mut self, links: &[String]) {
        let mut next = Vec::new();

        for link in links {
            let url = match Url::parse(link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Failed to parse link {}: {}", link, e);
                    continue;
                }
            };

            let key = page_key(&url);

            if !self.scope.contains(&key) {
                self.stats.record_out_of_scope();
                continue;
            }

            if self.visited_pages.contains(&key) {
                continue;
            }

            next.push(QueuedUrl {
                url: fetch_target(&url),
                key,
            });
        }

        self.scheduler.add_discovered(next);
    }

    fn set_page_state(&mut self, key: &str, state: PageState) {
        let previous = self
            .page_states
            .insert(key.to_string(), state)
            .unwrap_or(PageState::Unvisited);
        debug_assert!(
            previous.can_transition_to(state),
            "Invalid page transition {} -> {} for {}",
            previous,
            state,
            key
        );
    }

    /// Terminal (or current) state of a page, by page key
    pub fn page_state(&self, key: &str) -> PageState {
        self.page_states
            .get(key)
            .copied()
            .unwrap_or(PageState::Unvisited)
    }

    pub fn visited_pages(&self) -> &HashSet<String> {
        &self.visited_pages
    }

    pub fn visited_resources(&self) -> &HashSet<String> {
        &self.visited_resources
    }

    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }
}
