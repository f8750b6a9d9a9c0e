//! Output module for reporting harvest results

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
