use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use super::ArtworkError;

/// Decodes downloaded cover bytes and re-encodes them in the cache's format.
pub trait ImageCodec: Send + Sync {
    /// File extension of the encoded output, without the dot.
    fn extension(&self) -> &'static str;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ArtworkError>;

    /// Decode `bytes`, optionally resize to a `size`×`size` square, and encode.
    fn transcode(&self, bytes: &[u8], size: Option<u32>) -> Result<Vec<u8>, ArtworkError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ArtworkError> {
        Ok(image::load_from_memory(bytes)?)
    }

    fn transcode(&self, bytes: &[u8], size: Option<u32>) -> Result<Vec<u8>, ArtworkError> {
        let mut img = self.decode(bytes)?;
        if let Some(size) = size {
            img = img.resize_exact(size, size, FilterType::Lanczos3);
        }

        let mut encoded = Vec::new();
        img.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
        Ok(encoded)
    }
}
