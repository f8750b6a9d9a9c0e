use crate::UrlError;
use url::Url;

/// Parses an absolute address and rejects anything that is not HTTP(S)
///
/// # Examples
///
/// ```
/// use archive_harvest::url::parse_http_url;
///
/// assert!(parse_http_url("https://example.com/page").is_ok());
/// assert!(parse_http_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Computes the identity of a page for the visited set
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove every trailing slash
///
/// Query strings are kept: archive snapshots use them to tell pages apart.
///
/// # Examples
///
/// ```
/// use archive_harvest::url::page_key;
/// use url::Url;
///
/// let url = Url::parse("http://example.test/site/about/#team").unwrap();
/// assert_eq!(page_key(&url), "http://example.test/site/about");
/// ```
pub fn page_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.as_str().trim_end_matches('/').to_string()
}

/// Returns the address that should actually be requested for a page
///
/// Only the fragment is dropped; the trailing slash is preserved because
/// servers commonly distinguish `/dir` from `/dir/`.
pub fn fetch_target(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}
