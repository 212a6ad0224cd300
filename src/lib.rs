//! Unique-Ledger: an item ledger scraper for wiki-style documentation sites
//!
//! This crate crawls a single index page, fetches every linked item page through a
//! disk-backed retrying fetcher, classifies each page with an ordered heuristic decision
//! tree, and aggregates the results into a category-ordered JSON document.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Unique-Ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error for {url}: {message}")]
    Image { url: String, message: String },

    #[error("Output error: {0}")]
    Output(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while resolving a URL to a parsed document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed document from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Cache IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FetchError {
    /// Returns true if another attempt may succeed
    ///
    /// Network failures and non-2xx statuses are transient; malformed markup and
    /// local IO failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::Status { .. })
    }
}

/// Result type alias for Unique-Ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use classify::{Classification, Classifier, MainType, ParsedDocument};
pub use config::Config;
pub use crawler::{Coordinator, Fetcher, RetryPolicy};
pub use output::{CategoryResults, Item};
