//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `PageState`: lifecycle of a single page (unvisited, in progress, persisted, failed)
//! - `ResourceState`: outcome of a single embedded resource

mod page_state;
mod resource_state;

// Re-export main types
pub use page_state::PageState;
pub use resource_state::ResourceState;
