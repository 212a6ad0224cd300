use serde::Deserialize;

/// Main configuration structure for Unique-Ledger
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root of the wiki; the index page lives at `<base-url>/Unique`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Category names in output order
    #[serde(default)]
    pub categories: Vec<String>,

    /// Known location names matched against page paragraphs
    #[serde(default)]
    pub locations: Vec<String>,

    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Returns the index page URL
    pub fn index_url(&self) -> String {
        format!("{}/Unique", self.base_url.trim_end_matches('/'))
    }

    /// Returns the number of item URLs to process, if limited
    pub fn item_limit(&self) -> Option<usize> {
        self.scraper.test_mode.then_some(self.scraper.test_amount)
    }
}

/// Scheduling and HTTP behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum number of item pages processed at once
    #[serde(rename = "concurrency-limit", default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Only process the first `test-amount` discovered URLs
    #[serde(rename = "test-mode", default)]
    pub test_mode: bool,

    #[serde(rename = "test-amount", default = "default_test_amount")]
    pub test_amount: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            test_mode: false,
            test_amount: default_test_amount(),
            request_timeout_secs: default_request_timeout(),
            user_agent: None,
        }
    }
}

/// Page cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding `<sha256(url)>.html` files
    #[serde(default = "default_cache_dir")]
    pub dir: String,

    /// Maximum age of a reusable cache entry (seconds)
    #[serde(rename = "expiry-secs", default = "default_cache_expiry")]
    pub expiry_secs: u64,

    /// Serve fresh cache entries instead of hitting the network
    #[serde(rename = "use-cache", default = "default_true")]
    pub use_cache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            expiry_secs: default_cache_expiry(),
            use_cache: true,
        }
    }
}

/// Retry behaviour for page fetches
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts per URL
    #[serde(rename = "retry-limit", default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Base of the exponential backoff (seconds)
    #[serde(rename = "backoff-factor", default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_limit: default_retry_limit(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// JSON file name inside `dir`
    #[serde(default = "default_output_file")]
    pub file: String,

    /// Directory holding downloaded preview images
    #[serde(rename = "image-dir", default = "default_image_dir")]
    pub image_dir: String,

    /// Prepended to every recorded image path
    #[serde(rename = "image-path-prefix", default)]
    pub image_path_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file: default_output_file(),
            image_dir: default_image_dir(),
            image_path_prefix: String::new(),
        }
    }
}

fn default_concurrency_limit() -> usize {
    5
}

fn default_test_amount() -> usize {
    20
}

fn default_request_timeout() -> u64 {
    20
}

fn default_cache_dir() -> String {
    ".cache".to_string()
}

fn default_cache_expiry() -> u64 {
    24 * 3600
}

fn default_true() -> bool {
    true
}

fn default_retry_limit() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    1.5
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_output_file() -> String {
    "unique_items.json".to_string()
}

fn default_image_dir() -> String {
    "output/images".to_string()
}
