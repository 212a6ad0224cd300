//! Cache-aware HTTP fetcher
//!
//! This module resolves URLs to parsed documents:
//! - Building the shared HTTP client (timeout, redirect policy, user agent)
//! - Serving fresh cache entries without touching the network
//! - GET requests with retry and exponential backoff
//! - Persisting every successful response body to the cache

use crate::classify::ParsedDocument;
use crate::config::{Config, ScraperConfig};
use crate::crawler::cache::PageCache;
use crate::crawler::retry::RetryPolicy;
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Builds the HTTP client shared by every request of a run
///
/// Redirects are followed; every request carries the configured timeout.
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config.user_agent.clone().unwrap_or_else(|| {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    });

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Resolves URLs to parsed documents through the page cache
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    cache: PageCache,
    retry: RetryPolicy,
    use_cache: bool,
}

impl Fetcher {
    /// Creates a fetcher and makes sure the cache directory exists
    pub async fn new(
        client: Client,
        cache: PageCache,
        retry: RetryPolicy,
        use_cache: bool,
    ) -> Result<Self, FetchError> {
        cache.ensure_dir().await?;
        tracing::debug!(
            "Page cache at {} (reads {})",
            cache.dir().display(),
            if use_cache { "enabled" } else { "disabled" }
        );
        Ok(Self {
            client,
            cache,
            retry,
            use_cache,
        })
    }

    /// Creates a fetcher from configuration
    pub async fn from_config(client: Client, config: &Config) -> Result<Self, FetchError> {
        Self::new(
            client,
            PageCache::new(&config.cache.dir, config.cache.expiry_secs),
            RetryPolicy::from(&config.retry),
            config.cache.use_cache,
        )
        .await
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches `url` and parses it
    ///
    /// # Returns
    ///
    /// * `Ok(ParsedDocument)` - From a fresh cache entry or the network
    /// * `Err(FetchError)` - Retries exhausted, or the page is empty/unreadable
    pub async fn fetch(&self, url: &str) -> Result<ParsedDocument, FetchError> {
        let text = self.fetch_text(url).await?;
        Ok(ParsedDocument::parse(&text))
    }

    /// Fetches the raw text of `url`, honouring the cache
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if self.use_cache {
            if let Some(text) = self.cache.read_fresh(url).await? {
                tracing::debug!("Using cached file for {}", url);
                return ensure_markup(url, text);
            }
        }

        let text = self
            .retry
            .run(url, |_| self.get_once(url))
            .await?;
        let text = ensure_markup(url, text)?;

        // Always refresh the entry, even when reads are disabled
        match self.cache.write(url, &text).await {
            Ok(()) => tracing::trace!("Cached {} at {}", url, self.cache.path_for(url).display()),
            Err(e) => tracing::warn!("Failed to cache {}: {}", url, e),
        }

        Ok(text)
    }

    /// One GET request; non-2xx statuses are errors
    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Rejects documents with no content to parse
fn ensure_markup(url: &str, text: String) -> Result<String, FetchError> {
    if text.trim().is_empty() {
        return Err(FetchError::Parse {
            url: url.to_string(),
            message: "Document is empty".to_string(),
        });
    }
    Ok(text)
}
