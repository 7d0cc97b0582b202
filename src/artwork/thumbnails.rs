use std::collections::HashMap;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use super::{album_key, ArtworkError, ArtworkStore, ImageCodec};
use crate::models::TrackRecord;

/// Edge length of list thumbnails.
pub const THUMBNAIL_SIZE: u32 = 80;

/// In-session cache of decoded cover thumbnails, keyed by album key.
///
/// The key is derived from a mutable field, so whoever edits a record's album
/// (or genre, which picks the placeholder colour) must call
/// [`ThumbnailCache::invalidate`] or [`ThumbnailCache::clear`].
pub struct ThumbnailCache {
    store: Arc<dyn ArtworkStore>,
    codec: Arc<dyn ImageCodec>,
    entries: HashMap<String, Arc<RgbaImage>>,
}

impl ThumbnailCache {
    pub fn new(store: Arc<dyn ArtworkStore>, codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            store,
            codec,
            entries: HashMap::new(),
        }
    }

    /// Thumbnail for a record: cached, loaded from disk, or a genre-coloured tile.
    pub fn load(&mut self, record: &TrackRecord) -> Arc<RgbaImage> {
        let key = album_key(&record.album);
        if let Some(thumbnail) = self.entries.get(&key) {
            return Arc::clone(thumbnail);
        }

        let thumbnail = match self.load_from_store(&key) {
            Ok(Some(img)) => img,
            Ok(None) => placeholder(&record.genre),
            Err(e) => {
                tracing::warn!("Failed to load cover for '{}': {}", record.album, e);
                placeholder(&record.genre)
            }
        };

        let thumbnail = Arc::new(thumbnail);
        self.entries.insert(key, Arc::clone(&thumbnail));
        thumbnail
    }

    pub fn contains(&self, album: &str) -> bool {
        self.entries.contains_key(&album_key(album))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn invalidate(&mut self, album: &str) {
        self.entries.remove(&album_key(album));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn load_from_store(&self, key: &str) -> Result<Option<RgbaImage>, ArtworkError> {
        if key.is_empty() {
            return Ok(None);
        }
        let file_name = format!("{}.{}", key, self.codec.extension());
        if !self.store.exists(&file_name) {
            return Ok(None);
        }

        let bytes = self.store.read(&file_name)?;
        let img = self.codec.decode(&bytes)?;
        Ok(Some(
            img.resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
                .to_rgba8(),
        ))
    }
}

/// Tile colour for records without a cover.
pub fn placeholder_color(genre: &str) -> [u8; 3] {
    match genre.trim().to_lowercase().as_str() {
        "rock" => [0xE7, 0x4C, 0x3C],
        "pop" => [0x34, 0x98, 0xDB],
        "jazz" => [0x9B, 0x59, 0xB6],
        "classical" => [0x1A, 0xBC, 0x9C],
        "hip hop" => [0xF3, 0x9C, 0x12],
        "electronic" => [0x2E, 0xCC, 0x71],
        _ => [0x34, 0x49, 0x5E],
    }
}

fn placeholder(genre: &str) -> RgbaImage {
    let [r, g, b] = placeholder_color(genre);
    RgbaImage::from_pixel(THUMBNAIL_SIZE, THUMBNAIL_SIZE, Rgba([r, g, b, 255]))
}
