/// The set of addresses a harvest is allowed to visit
///
/// Membership is a string-prefix test on page keys (see [`page_key`]).
/// When the configured prefix ends in `/`, the prefix without that slash
/// also matches, so the directory page itself stays in scope after its
/// trailing slash has been normalized away. Sibling paths that merely share
/// the characters (`/site-old` for prefix `/site/`) do not match.
///
/// [`page_key`]: crate::url::page_key
///
/// # Examples
///
/// ```
/// use archive_harvest::url::OriginScope;
///
/// let scope = OriginScope::new("http://example.test/site/");
/// assert!(scope.contains("http://example.test/site"));
/// assert!(scope.contains("http://example.test/site/about"));
/// assert!(!scope.contains("http://example.test/site-old"));
/// assert!(!scope.contains("http://example.test/other.test"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginScope {
    prefix: String,
    directory: Option<String>,
}

impl OriginScope {
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim().to_string();
        let directory = prefix
            .strip_suffix('/')
            .map(|dir| dir.trim_end_matches('/').to_string());

        Self { prefix, directory }
    }

    /// The prefix as configured
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Checks whether a normalized page key lies inside the scope
    pub fn contains(&self, key: &str) -> bool {
        if key.starts_with(&self.prefix) {
            return true;
        }

        match &self.directory {
            Some(dir) => key == dir,
            None => false,
        }
    }
}
