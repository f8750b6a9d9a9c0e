//! Fetch capabilities the coordinator depends on
//!
//! The coordinator never talks to reqwest or the browser directly; it only
//! sees these two traits, so page acquisition can be swapped between a
//! plain HTTP GET and a rendered-browser load.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page markup
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS, browser failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Errors from a resource download
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },
}

/// Acquires the markup of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &Url) -> FetchResult;

    /// Short label used in log lines
    fn name(&self) -> &'static str;
}

/// Downloads the raw bytes of an embedded resource
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch_resource(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}
