//! Local store for infobox preview images
//!
//! Images are keyed by the SHA-256 of their URL and always saved with a `.png`
//! extension, whatever the actual format. An existing file is never re-downloaded.

use crate::crawler::cache::url_digest;
use crate::LedgerError;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Turns a protocol-relative `//host/path` reference into an absolute HTTPS URL
pub fn absolutize_image_url(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else {
        src.to_string()
    }
}

/// Directory of downloaded images
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Creates the store, creating its directory if absent
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the image at `image_url` is stored under
    pub fn path_for(&self, image_url: &str) -> PathBuf {
        self.dir.join(format!("{}.png", url_digest(image_url)))
    }

    /// Downloads `image_url` unless already stored, and returns its local path
    ///
    /// The existence check and the write are not atomic together; two tasks storing
    /// the same URL at once both download it and write identical bytes.
    pub async fn store(&self, client: &Client, image_url: &str) -> Result<PathBuf, LedgerError> {
        let path = self.path_for(image_url);

        if tokio::fs::try_exists(&path).await? {
            tracing::trace!("Image already stored: {}", path.display());
            return Ok(path);
        }

        tracing::debug!("Downloading image {} -> {}", image_url, path.display());
        let response = client
            .get(image_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| LedgerError::Image {
                url: image_url.to_string(),
                message: e.to_string(),
            })?;
        let bytes = response.bytes().await?;

        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absolutize_protocol_relative() {
        assert_eq!(
            absolutize_image_url("//cdn.wiki/images/a.webp"),
            "https://cdn.wiki/images/a.webp"
        );
        assert_eq!(
            absolutize_image_url("https://cdn.wiki/a.png"),
            "https://cdn.wiki/a.png"
        );
        assert_eq!(absolutize_image_url("/images/a.png"), "/images/a.png");
    }

    #[tokio::test]
    async fn test_path_for_uses_png_extension() {
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path().join("images")).await.unwrap();

        let path = store.path_for("https://cdn.wiki/a.webp");
        assert!(store.dir().is_dir());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(
            path.file_stem().and_then(|s| s.to_str()),
            Some(url_digest("https://cdn.wiki/a.webp").as_str())
        );
    }

    #[tokio::test]
    async fn test_existing_image_is_not_downloaded() {
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path()).await.unwrap();
        let url = "http://127.0.0.1:9/unreachable.png";
        std::fs::write(store.path_for(url), b"png").unwrap();

        let path = store.store(&Client::new(), url).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png");
    }
}
