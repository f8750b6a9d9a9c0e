//! HTML parser for extracting resources and links
//!
//! This module handles parsing page markup to extract:
//! - Embedded image addresses (from <img> tags)
//! - Links to follow (from <a> tags)

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Attribute read first on <img> elements
const PRIMARY_IMAGE_ATTR: &str = "src";

/// Lazy-load attribute used when the primary one is missing
const LAZY_IMAGE_ATTR: &str = "data-src";

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Embedded image addresses (absolute, in document order, duplicates kept)
    pub images: Vec<String>,

    /// All links found on the page (absolute URLs)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts image and link addresses
///
/// # Extraction Rules
///
/// **Images:** every `<img>`; `src` when present and non-empty, otherwise
/// `data-src`.
///
/// **Links:** every `<a href>`.
///
/// **Excluded:** `javascript:`, `mailto:`, `tel:` and `data:` references,
/// fragment-only links and anything that does not resolve to HTTP(S).
///
/// # Example
///
/// ```
/// use archive_harvest::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<body><img src="/logo.png"><a href="about">About</a></body>"#;
/// let base_url = Url::parse("https://example.com/site/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.images, vec!["https://example.com/logo.png"]);
/// assert_eq!(parsed.links, vec!["https://example.com/site/about"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        images: extract_images(&document, base_url),
        links: extract_links(&document, base_url),
    }
}

/// Extracts image addresses, preferring the primary attribute
fn extract_images(document: &Html, base_url: &Url) -> Vec<String> {
    let mut images = Vec::new();

    if let Ok(img_selector) = Selector::parse("img") {
        for element in document.select(&img_selector) {
            if let Some(src) = image_source(&element) {
                if let Some(absolute_url) = resolve_link(src, base_url) {
                    images.push(absolute_url);
                }
            }
        }
    }

    images
}

fn image_source<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let value = element.value();
    value
        .attr(PRIMARY_IMAGE_ATTR)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| value.attr(LAZY_IMAGE_ATTR))
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a reference to an absolute URL and validates it
///
/// Returns None if the reference should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only references
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
