//! HTTP fetcher implementation
//!
//! This module handles all plain HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for page markup
//! - GET requests for resource bytes
//! - Error classification
//!
//! No request is ever retried.

use crate::config::HttpConfig;
use crate::crawler::source::{FetchError, FetchResult, PageSource, ResourceSource};
use crate::url::{page_key, OriginScope};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to [`MAX_REDIRECTS`] hops. With a `scope`, a
/// redirect whose target lies outside it is not followed; the 3xx response
/// itself is returned instead.
///
/// # Example
///
/// ```no_run
/// use archive_harvest::config::HttpConfig;
/// use archive_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default(), None).unwrap();
/// ```
pub fn build_http_client(
    config: &HttpConfig,
    scope: Option<&OriginScope>,
) -> Result<Client, reqwest::Error> {
    let policy = match scope {
        Some(scope) => scoped_redirect_policy(scope.clone()),
        None => Policy::limited(MAX_REDIRECTS),
    };

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(policy)
        .gzip(true)
        .brotli(true)
        .build()
}

fn scoped_redirect_policy(scope: OriginScope) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let key = page_key(attempt.url());
        if scope.contains(&key) {
            attempt.follow()
        } else {
            tracing::debug!("Not following redirect to external URL: {}", key);
            attempt.stop()
        }
    })
}

/// Page and resource source backed by reqwest
///
/// Page requests only follow redirects that stay inside the origin scope;
/// resource requests follow any redirect.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    page_client: Client,
    resource_client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig, scope: &OriginScope) -> Result<Self, reqwest::Error> {
        Ok(Self {
            page_client: build_http_client(config, Some(scope))?,
            resource_client: build_http_client(config, None)?,
        })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_page(&self, url: &Url) -> FetchResult {
        fetch_url(&self.page_client, url).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[async_trait]
impl ResourceSource for HttpFetcher {
    async fn fetch_resource(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        fetch_bytes(&self.resource_client, url).await
    }
}

/// Fetches a page and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError |
/// | Connection refused / DNS | NetworkError |
/// | Body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: format!("Connection failed: {}", e),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Downloads the body of a resource as raw bytes
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    };

    let response = client.get(url.clone()).send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(classify)?;
    Ok(bytes.to_vec())
}
