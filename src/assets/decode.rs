use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Rgba8},
    error::{BongoError, BongoResult},
};

/// Smallest accepted source width and height, in pixels.
pub const MIN_SOURCE_DIM: u32 = 10;

/// A decoded source raster: straight-alpha RGBA8, tightly packed, row-major.
///
/// Pixels are shared behind an [`Arc`] and never mutated; every synthesized frame starts from its
/// own copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap an already-decoded RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> BongoResult<Self> {
        let expected = Canvas { width, height }.rgba8_len()?;
        if rgba8.len() != expected {
            return Err(BongoError::invalid_input(format!(
                "rgba8 buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// A uniformly filled image, mostly useful for tests and previews.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> BongoResult<Self> {
        let len = Canvas { width, height }.rgba8_len()?;
        let px = color.to_array();
        let rgba8 = px.iter().copied().cycle().take(len).collect();
        Self::from_rgba8(width, height, rgba8)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Borrow the RGBA8 pixels.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Fail with [`BongoError::InvalidInput`] when either side is below [`MIN_SOURCE_DIM`].
    pub fn ensure_min_size(&self) -> BongoResult<()> {
        if self.width < MIN_SOURCE_DIM || self.height < MIN_SOURCE_DIM {
            return Err(BongoError::invalid_input(format!(
                "image too small: {}x{} (minimum size is {MIN_SOURCE_DIM}x{MIN_SOURCE_DIM} pixels)",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Decode encoded image bytes (PNG, JPEG, GIF, ...) into a [`SourceImage`].
pub fn decode_image(bytes: &[u8]) -> BongoResult<SourceImage> {
    let dyn_img =
        image::load_from_memory(bytes).map_err(|e| BongoError::image_decode(e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> BongoResult<SourceImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
