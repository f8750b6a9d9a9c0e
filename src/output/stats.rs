//! Statistics gathered during a harvest
//!
//! The coordinator records the terminal state of every page and resource it
//! handles; this module aggregates those counts and prints them.

use crate::state::{PageState, ResourceState};
use std::collections::HashMap;
use std::time::Duration;

/// Harvest statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Count of pages by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Count of resource references by outcome
    pub resources_by_state: HashMap<ResourceState, u64>,

    /// Links discarded because they fell outside the origin prefix
    pub out_of_scope_links: u64,

    /// Wall-clock duration of the run, set when the frontier is exhausted
    pub duration: Option<Duration>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_page(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn record_resource(&mut self, state: ResourceState) {
        *self.resources_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn record_out_of_scope(&mut self) {
        self.out_of_scope_links += 1;
    }

    pub fn pages(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    pub fn resources(&self, state: ResourceState) -> u64 {
        self.resources_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Pages for which a fetch was issued
    pub fn pages_visited(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    /// Resource references for which a request was issued
    pub fn resource_fetches(&self) -> u64 {
        self.resources_by_state
            .iter()
            .filter(|(state, _)| state.was_fetched())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Pages:");
    println!("  Visited: {}", stats.pages_visited());
    for state in PageState::all_states() {
        let count = stats.pages(state);
        if count > 0 {
            println!("  {}: {}", state, count);
        }
    }
    println!("  Out-of-scope links skipped: {}", stats.out_of_scope_links);
    println!();

    println!("Resources:");
    println!("  Requests issued: {}", stats.resource_fetches());
    for state in ResourceState::all_states() {
        let count = stats.resources(state);
        if count > 0 {
            println!("  {}: {}", state, count);
        }
    }
    println!();

    let persisted = stats.pages(PageState::Persisted);
    let visited = stats.pages_visited();
    let success_rate = if visited > 0 {
        (persisted as f64 / visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages saved)",
        success_rate, persisted, visited
    );

    if let Some(duration) = stats.duration {
        println!("Duration: {:.1}s", duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut stats = CrawlStatistics::new();
        stats.record_page(PageState::Persisted);
        stats.record_page(PageState::Persisted);
        stats.record_page(PageState::Failed);
        stats.record_resource(ResourceState::Downloaded);
        stats.record_resource(ResourceState::SkippedDuplicate);
        stats.record_resource(ResourceState::SkippedExisting);
        stats.record_resource(ResourceState::Failed);
        stats.record_out_of_scope();

        assert_eq!(stats.pages(PageState::Persisted), 2);
        assert_eq!(stats.pages(PageState::Failed), 1);
        assert_eq!(stats.pages(PageState::InProgress), 0);
        assert_eq!(stats.pages_visited(), 3);
        assert_eq!(stats.resource_fetches(), 2);
        assert_eq!(stats.out_of_scope_links, 1);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = CrawlStatistics::new();
        assert_eq!(stats.pages_visited(), 0);
        assert_eq!(stats.resource_fetches(), 0);
        assert!(stats.duration.is_none());
    }
}
