//! URL handling module for Archive-Harvest
//!
//! This module provides page-identity normalization, the origin-scope check
//! and the derivation of local file names from addresses.

mod naming;
mod normalize;
mod scope;

// Re-export main functions
pub use naming::{fallback_resource_name, page_file_name, resource_file_name, INDEX_FILE_NAME};
pub use normalize::{fetch_target, page_key, parse_http_url};
pub use scope::OriginScope;
