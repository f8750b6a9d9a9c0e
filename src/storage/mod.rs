//! Storage module for persisting harvested data
//!
//! This module handles all writes for the crawler:
//! - Page markup into the html directory
//! - Downloaded resources into the image directory
//! - The shared log of resolved resource addresses

mod files;
mod traits;

pub use files::FileStorage;
pub use traits::{Storage, StorageError, StorageResult};

use url::Url;

/// One fetched page, alive only while it is being processed
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Address the markup was fetched from
    pub url: Url,
    /// Raw markup as received
    pub markup: String,
    /// Resolved addresses of embedded resources, in document order
    pub resources: Vec<String>,
    /// Resolved outbound link addresses, in document order
    pub links: Vec<String>,
}

/// One downloaded resource, alive only until it is written
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub url: Url,
    /// Local file name inside the image directory
    pub name: String,
    pub bytes: Vec<u8>,
}
