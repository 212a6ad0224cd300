//! Disk-backed page cache
//!
//! Entries are stored as `<sha256(url)>.html` and are reusable while younger than the
//! configured expiry. The cache is append-only: entries are overwritten on re-fetch
//! and never deleted. Concurrent writers only ever race on identical content.

use crate::FetchError;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Hex-encoded SHA-256 of a URL, used as a file name key
pub fn url_digest(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Page cache rooted at a directory
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    expiry: Duration,
}

impl PageCache {
    /// Creates a cache handle; call [`PageCache::ensure_dir`] before writing
    pub fn new(dir: impl Into<PathBuf>, expiry_secs: u64) -> Self {
        let secs = i64::try_from(expiry_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);

        Self {
            dir: dir.into(),
            expiry: Duration::seconds(secs),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if absent
    pub async fn ensure_dir(&self) -> Result<(), FetchError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| FetchError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    /// Path of the entry for `url`
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.html", url_digest(url)))
    }

    /// Returns true if an entry last modified at `modified` is still reusable
    pub fn is_fresh(&self, modified: DateTime<Utc>) -> bool {
        Utc::now() - modified < self.expiry
    }

    /// Reads the entry for `url` if it exists and has not expired
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - Fresh cached page text
    /// * `Ok(None)` - No entry, or the entry is stale
    /// * `Err(FetchError)` - The entry exists but could not be read or is not UTF-8
    pub async fn read_fresh(&self, url: &str) -> Result<Option<String>, FetchError> {
        let path = self.path_for(url);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FetchError::Io { path, source }),
        };

        let modified = metadata
            .modified()
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;

        if !self.is_fresh(DateTime::<Utc>::from(modified)) {
            tracing::debug!("Cache entry for {} is stale", url);
            return Ok(None);
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| FetchError::Parse {
                url: url.to_string(),
                message: format!("cached entry {} is not UTF-8: {}", path.display(), e),
            })
    }

    /// Writes (or overwrites) the entry for `url`
    pub async fn write(&self, url: &str, body: &str) -> Result<(), FetchError> {
        let path = self.path_for(url);
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| FetchError::Io { path, source })
    }
}
