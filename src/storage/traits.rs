//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{PageRecord, ResourceRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawler owns its storage exclusively, so methods take `&mut self`
/// where they change on-disk state.
pub trait Storage {
    // ===== Pages =====

    /// Writes the page markup and appends its resource addresses to the link log
    ///
    /// # Returns
    ///
    /// The path the markup was written to
    fn persist_page(&mut self, page: &PageRecord) -> StorageResult<PathBuf>;

    // ===== Resources =====

    /// Checks whether a resource with this local name is already stored
    fn resource_exists(&self, name: &str) -> bool;

    /// Writes resource bytes under the record's local name
    fn persist_resource(&mut self, resource: &ResourceRecord) -> StorageResult<PathBuf>;
}
