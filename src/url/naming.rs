//! Local file names derived from addresses

use url::Url;

/// File name used for a page whose path is empty
pub const INDEX_FILE_NAME: &str = "index.html";

/// Characters replaced in derived file names
const FILLER: char = '_';

/// Derives the markup file name for a page
///
/// The path (query and fragment ignored) is stripped of surrounding slashes
/// and every remaining separator becomes `_`. An empty path maps to
/// [`INDEX_FILE_NAME`].
///
/// # Examples
///
/// ```
/// use archive_harvest::url::page_file_name;
/// use url::Url;
///
/// let url = Url::parse("http://example.test/site/about/").unwrap();
/// assert_eq!(page_file_name(&url), "site_about");
///
/// let root = Url::parse("http://example.test/").unwrap();
/// assert_eq!(page_file_name(&root), "index.html");
/// ```
pub fn page_file_name(url: &Url) -> String {
    let trimmed = url.path().trim_matches('/');
    if trimmed.is_empty() {
        return INDEX_FILE_NAME.to_string();
    }
    sanitize(trimmed)
}

/// Derives the stored name of a resource from the last segment of its path
///
/// Returns `None` when the path ends in `/` or is empty; callers fall back
/// to [`fallback_resource_name`].
pub fn resource_file_name(url: &Url) -> Option<String> {
    let basename = url.path().rsplit('/').next().unwrap_or("");
    if basename.is_empty() || basename == "." || basename == ".." {
        return None;
    }
    Some(sanitize(basename))
}

/// Timestamp-based name for resources whose address has no basename
pub fn fallback_resource_name(timestamp_millis: i64) -> String {
    format!("image_{}.jpg", timestamp_millis)
}

/// Replaces path separators and characters rejected by common filesystems
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => FILLER,
            c if c.is_control() => FILLER,
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_page_name_nested_path() {
        assert_eq!(page_file_name(&url("http://example.test/site/about")), "site_about");
    }

    #[test]
    fn test_page_name_ignores_query_and_fragment() {
        assert_eq!(
            page_file_name(&url("http://example.test/site/list?page=2#top")),
            "site_list"
        );
    }

    #[test]
    fn test_page_name_empty_path() {
        assert_eq!(page_file_name(&url("http://example.test")), INDEX_FILE_NAME);
        assert_eq!(page_file_name(&url("http://example.test/")), INDEX_FILE_NAME);
    }

    #[test]
    fn test_page_name_archive_address() {
        assert_eq!(
            page_file_name(&url(
                "https://web.archive.org/web/20240911141314/https://apueducation.us/faculty-staff/"
            )),
            "web_20240911141314_https___apueducation.us_faculty-staff"
        );
    }

    #[test]
    fn test_page_names_collide_for_distinct_addresses() {
        assert_eq!(
            page_file_name(&url("http://example.test/a/b")),
            page_file_name(&url("http://example.test/a_b"))
        );
    }

    #[test]
    fn test_resource_name_basename() {
        assert_eq!(
            resource_file_name(&url("http://example.test/img/logo.png?v=3")),
            Some("logo.png".to_string())
        );
    }

    #[test]
    fn test_resource_name_missing_basename() {
        assert_eq!(resource_file_name(&url("http://example.test/img/")), None);
        assert_eq!(resource_file_name(&url("http://example.test")), None);
    }

    #[test]
    fn test_resource_name_keeps_percent_encoding() {
        assert_eq!(
            resource_file_name(&url("http://example.test/img/my%20photo.jpg")),
            Some("my%20photo.jpg".to_string())
        );
    }

    #[test]
    fn test_fallback_name() {
        assert_eq!(fallback_resource_name(1726063994000), "image_1726063994000.jpg");
    }
}
