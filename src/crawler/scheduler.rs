//! Scheduler for managing the crawl frontier and polite delays
//!
//! This module handles:
//! - The worklist of pages still to visit
//! - Depth-first or breadth-first ordering of that worklist
//! - The fixed sleeps before page fetches and resource downloads

use crate::config::{CrawlerConfig, Traversal};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// A page waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Address to request (fragment removed)
    pub url: Url,

    /// Normalized identity used by the visited set
    pub key: String,
}

/// Scheduler manages the frontier queue and rate limiting
///
/// Depth-first order reproduces what a recursive walk would do: the links of
/// the page just processed are visited, in document order, before anything
/// discovered earlier.
pub struct Scheduler {
    /// Pages to visit; always popped from the front
    frontier: VecDeque<QueuedUrl>,

    /// Keys currently in the frontier; each page is queued at most once
    queued: HashSet<String>,

    traversal: Traversal,

    /// Pause before every page fetch except the first
    page_delay: Duration,

    /// Pause before every resource download
    resource_delay: Duration,

    /// Number of page fetches started so far
    pages_started: u64,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            traversal: config.traversal,
            page_delay: Duration::from_millis(config.page_delay_ms),
            resource_delay: Duration::from_millis(config.resource_delay_ms),
            pages_started: 0,
        }
    }

    /// Adds the links discovered on one page
    ///
    /// A page already waiting in the frontier is not queued twice. Depth-first
    /// moves it to the front, where a recursive walk would reach it next;
    /// breadth-first leaves it at its earlier position.
    pub fn add_discovered(&mut self, urls: Vec<QueuedUrl>) {
        match self.traversal {
            Traversal::DepthFirst => {
                for url in urls.into_iter().rev() {
                    if !self.queued.insert(url.key.clone()) {
                        self.frontier.retain(|waiting| waiting.key != url.key);
                    }
                    self.frontier.push_front(url);
                }
            }
            Traversal::BreadthFirst => {
                for url in urls {
                    if self.queued.insert(url.key.clone()) {
                        self.frontier.push_back(url);
                    }
                }
            }
        }
    }

    /// Adds a single URL to the frontier
    pub fn add_to_frontier(&mut self, url: QueuedUrl) {
        self.add_discovered(vec![url]);
    }

    /// Gets the next URL to visit, if any
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        let next = self.frontier.pop_front()?;
        self.queued.remove(&next.key);
        Some(next)
    }

    /// Sleeps for the page delay unless this is the first fetch of the run
    pub async fn wait_before_page(&mut self) {
        if self.pages_started > 0 && !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }
        self.pages_started += 1;
    }

    /// Sleeps for the fixed delay that precedes every resource download
    pub async fn wait_before_resource(&self) {
        if !self.resource_delay.is_zero() {
            tokio::time::sleep(self.resource_delay).await;
        }
    }

    /// Gets the current size of the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Checks if the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }
}
