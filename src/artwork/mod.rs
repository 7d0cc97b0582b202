mod codec;
mod store;
mod thumbnails;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::resolver::transport::{HttpTransport, TransportError};

pub use codec::{ImageCodec, PngCodec};
pub use store::{ArtworkStore, DirectoryStore};
pub use thumbnails::{placeholder_color, ThumbnailCache, THUMBNAIL_SIZE};

/// Edge length of covers set by hand through [`ArtworkCache::store_local`].
pub const LOCAL_COVER_SIZE: u32 = 200;

#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("download failed: {0}")]
    Transport(#[from] TransportError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("album name '{0}' has no usable characters for a cache key")]
    InvalidKey(String),
}

/// Filesystem-safe cache key for an album name.
///
/// Keeps alphanumerics, spaces, `-` and `_`, trims, turns spaces into
/// underscores and lower-cases. Distinct albums can collide.
pub fn album_key(album: &str) -> String {
    album
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

/// Downloads cover art once per album key and keeps it on disk.
pub struct ArtworkCache<T> {
    transport: T,
    codec: Arc<dyn ImageCodec>,
    store: Arc<dyn ArtworkStore>,
}

impl<T: HttpTransport> ArtworkCache<T> {
    pub fn new(transport: T, codec: Arc<dyn ImageCodec>, store: Arc<dyn ArtworkStore>) -> Self {
        Self {
            transport,
            codec,
            store,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn codec(&self) -> Arc<dyn ImageCodec> {
        Arc::clone(&self.codec)
    }

    pub fn store(&self) -> Arc<dyn ArtworkStore> {
        Arc::clone(&self.store)
    }

    /// Path of the stored cover for `album`, if one exists.
    pub fn cached_path(&self, album: &str) -> Option<PathBuf> {
        let file_name = self.file_name(album).ok()?;
        self.store
            .exists(&file_name)
            .then(|| self.store.path_for(&file_name))
    }

    /// Fetch the cover at `url` and store it under `album`'s key.
    ///
    /// Idempotent by album key, not by URL: if a cover already exists for the
    /// key its path is returned without touching the network. Failures are
    /// logged and reported as `None`.
    pub async fn fetch_and_store(&self, url: &str, album: &str) -> Option<PathBuf> {
        match self.try_fetch_and_store(url, album).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Could not cache artwork for album '{}': {}", album, e);
                None
            }
        }
    }

    pub async fn try_fetch_and_store(&self, url: &str, album: &str) -> Result<PathBuf, ArtworkError> {
        let file_name = self.file_name(album)?;

        // 1. Reuse what is already on disk
        if self.store.exists(&file_name) {
            tracing::debug!("Artwork for '{}' already cached", album);
            return Ok(self.store.path_for(&file_name));
        }

        // 2. Download and re-encode
        tracing::info!("Downloading artwork for '{}'", album);
        let bytes = self.transport.get(url).await?;
        let encoded = self.codec.transcode(&bytes, None)?;

        // 3. Persist
        let path = self.store.write(&file_name, &encoded)?;
        tracing::info!("Artwork saved to {}", path.display());
        Ok(path)
    }

    /// Replace the cover for `album` with a user-supplied image.
    ///
    /// Callers holding a [`ThumbnailCache`] must invalidate the album afterwards.
    pub fn store_local(&self, bytes: &[u8], album: &str) -> Result<PathBuf, ArtworkError> {
        let file_name = self.file_name(album)?;
        let encoded = self.codec.transcode(bytes, Some(LOCAL_COVER_SIZE))?;
        let path = self.store.write(&file_name, &encoded)?;
        tracing::info!("Cover for '{}' replaced from local image", album);
        Ok(path)
    }

    fn file_name(&self, album: &str) -> Result<String, ArtworkError> {
        let key = album_key(album);
        if key.is_empty() {
            return Err(ArtworkError::InvalidKey(album.to_string()));
        }
        Ok(format!("{}.{}", key, self.codec.extension()))
    }
}
