use serde::Deserialize;

/// Main configuration structure for Archive-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
}

impl Config {
    /// Builds a configuration with defaults everywhere except the crawl target
    pub fn for_seed(seed: &str, origin_prefix: Option<&str>) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed: seed.to_string(),
                origin_prefix: origin_prefix.map(str::to_string),
                traversal: Traversal::default(),
                resource_delay_ms: default_resource_delay_ms(),
                page_delay_ms: 0,
                fetcher: FetcherKind::default(),
            },
            http: HttpConfig::default(),
            output: OutputConfig::default(),
            browser: BrowserConfig::default(),
            mirror: MirrorConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First address to visit
    pub seed: String,

    /// Only addresses starting with this prefix are crawled; defaults to the seed
    #[serde(rename = "origin-prefix", default)]
    pub origin_prefix: Option<String>,

    /// Order in which discovered links are visited
    #[serde(default)]
    pub traversal: Traversal,

    /// Pause before every resource download (milliseconds)
    #[serde(rename = "resource-delay-ms", default = "default_resource_delay_ms")]
    pub resource_delay_ms: u64,

    /// Pause before every page fetch after the first (milliseconds)
    #[serde(rename = "page-delay-ms", default)]
    pub page_delay_ms: u64,

    /// How page markup is acquired
    #[serde(default)]
    pub fetcher: FetcherKind,
}

impl CrawlerConfig {
    /// The effective origin prefix (explicit value or the seed itself)
    pub fn origin_prefix(&self) -> &str {
        self.origin_prefix.as_deref().unwrap_or(&self.seed)
    }
}

/// Frontier ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Traversal {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Page acquisition strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetcherKind {
    /// Plain HTTP GET of the raw markup
    #[default]
    Http,
    /// Headless browser render with scroll-to-bottom
    Rendered,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving page markup
    #[serde(rename = "html-dir", default = "default_html_dir")]
    pub html_dir: String,

    /// Directory receiving downloaded images
    #[serde(rename = "image-dir", default = "default_image_dir")]
    pub image_dir: String,

    /// Append-only log of resolved image addresses; defaults to `<html-dir>/image_links.txt`
    #[serde(rename = "image-links-file", default)]
    pub image_links_file: Option<String>,

    /// What happens when two pages derive the same file name
    #[serde(default)]
    pub collision: CollisionPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_dir: default_html_dir(),
            image_dir: default_image_dir(),
            image_links_file: None,
            collision: CollisionPolicy::default(),
        }
    }
}

/// Page file name collision handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Later pages get a numeric suffix (`about-2`)
    #[default]
    Suffix,
    /// Later pages silently replace earlier ones
    Overwrite,
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Chrome/Chromium executable; auto-detected when absent
    #[serde(rename = "chrome-path", default)]
    pub chrome_path: Option<String>,

    /// Wait after each scroll for lazy content (milliseconds)
    #[serde(rename = "scroll-pause-ms", default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,

    /// Upper bound on scroll rounds per page
    #[serde(rename = "max-scrolls", default = "default_max_scrolls")]
    pub max_scrolls: u32,

    /// Navigation timeout (seconds)
    #[serde(rename = "load-timeout-secs", default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            scroll_pause_ms: default_scroll_pause_ms(),
            max_scrolls: default_max_scrolls(),
            load_timeout_secs: default_load_timeout_secs(),
        }
    }
}

/// External mirroring tool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    #[serde(rename = "wget-path", default = "default_wget_path")]
    pub wget_path: String,

    #[serde(rename = "wait-secs", default = "default_wait_secs")]
    pub wait_secs: u64,

    #[serde(rename = "random-wait", default = "default_true")]
    pub random_wait: bool,

    #[serde(rename = "ignore-robots", default = "default_true")]
    pub ignore_robots: bool,

    #[serde(rename = "directory-prefix", default = "default_mirror_dir")]
    pub directory_prefix: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            wget_path: default_wget_path(),
            wait_secs: default_wait_secs(),
            random_wait: true,
            ignore_robots: true,
            directory_prefix: default_mirror_dir(),
        }
    }
}

fn default_resource_delay_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_html_dir() -> String {
    "data/html".to_string()
}

fn default_image_dir() -> String {
    "data/images".to_string()
}

fn default_scroll_pause_ms() -> u64 {
    2000
}

fn default_max_scrolls() -> u32 {
    50
}

fn default_load_timeout_secs() -> u64 {
    10
}

fn default_wget_path() -> String {
    "wget".to_string()
}

fn default_wait_secs() -> u64 {
    2
}

fn default_true() -> bool {
    true
}

fn default_mirror_dir() -> String {
    "data/mirror".to_string()
}
