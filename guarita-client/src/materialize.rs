//! Image materialization
//!
//! Turns a resolved image reference into a locally addressable resource
//! the print bridge can consume. `data:` and `file:` URIs pass through;
//! `http(s)` URLs are downloaded into the per-ticket cache with the
//! operator's token header.

use crate::{ClientError, ClientResult};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// A printable image resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintableImage {
    /// Cached or pre-existing local file
    Local(PathBuf),
    /// Remote URL the bridge must fetch itself (no-token fallback)
    Remote(String),
    /// Inline `data:` URI
    Inline(String),
}

impl PrintableImage {
    /// URI form handed to the print bridge
    pub fn as_uri(&self) -> String {
        match self {
            PrintableImage::Local(path) => format!("file://{}", path.display()),
            PrintableImage::Remote(url) | PrintableImage::Inline(url) => url.clone(),
        }
    }
}

/// Downloads label images into a per-ticket cache.
#[derive(Debug, Clone)]
pub struct Materializer {
    client: reqwest::Client,
    cache_dir: PathBuf,
    token: Option<String>,
}

impl Materializer {
    /// Create a materializer writing into `cache_dir`.
    ///
    /// `token` is the box-office token sent with authenticated downloads;
    /// without one, remote URLs are passed through to the bridge.
    pub fn new(cache_dir: impl Into<PathBuf>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_dir: cache_dir.into(),
            token,
        }
    }

    /// Deterministic cache path for a ticket key.
    ///
    /// The same ticket always maps to the same file, so a retry
    /// overwrites instead of accumulating copies.
    pub fn cache_path(&self, key: &str) -> PathBuf {
        // keep the key filesystem-safe; ids and hashes are opaque
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("ticket_preview_{}.jpg", safe))
    }

    /// Materialize an image reference for printing.
    #[instrument(skip(self))]
    pub async fn materialize(&self, url: &str, key: &str) -> ClientResult<PrintableImage> {
        if url.starts_with("data:") {
            return Ok(PrintableImage::Inline(url.to_string()));
        }
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PrintableImage::Local(PathBuf::from(path)));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::ImageUnavailable(format!(
                "Unsupported image URI scheme: {}",
                url
            )));
        }

        let Some(token) = self.token.as_deref() else {
            // no credentials to attach; let the bridge fetch it directly
            info!("No token available, passing remote URL through");
            return Ok(PrintableImage::Remote(url.to_string()));
        };

        self.download(url, token, &self.cache_path(key)).await
    }

    async fn download(&self, url: &str, token: &str, path: &Path) -> ClientResult<PrintableImage> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .client
            .get(url)
            .header("X-Token-Bilheteria", token)
            .send()
            .await
            .map_err(|e| ClientError::ImageUnavailable(format!("Download failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() != 200 {
            warn!(status = status.as_u16(), "image download rejected");
            return Err(ClientError::ImageUnavailable(format!(
                "Download status {}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::ImageUnavailable(format!("Download read failed: {}", e)))?;
        tokio::fs::write(path, &bytes).await?;

        info!(path = %path.display(), bytes = bytes.len(), "image cached");
        Ok(PrintableImage::Local(path.to_path_buf()))
    }
}
