use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    error::{OverlayzError, OverlayzResult},
    math::premultiply_rgba8_in_place,
};

/// Fully decoded raster in premultiplied RGBA8 form.
///
/// Cloning is cheap: pixel storage is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap premultiplied pixels that are already in memory.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> OverlayzResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| OverlayzError::image_load("image dimensions overflow"))?;
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(OverlayzError::image_load(format!(
                "expected {width}x{height} rgba8 buffer ({expected} bytes), got {} bytes",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Natural aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Premultiplied pixel at `(x, y)`; caller guarantees bounds.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// Any failure (unknown format, truncated data, zero-sized image) maps to
/// [`OverlayzError::ImageLoad`].
pub fn decode_image(bytes: &[u8]) -> OverlayzResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(OverlayzError::image_load_from)?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    DecodedImage::from_premul_rgba8(width, height, rgba8_premul)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
