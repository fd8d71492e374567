use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;

use crate::{
    foundation::error::{OverlayzError, OverlayzResult},
    render::surface::Surface,
};

/// Filename used when the caller passes an empty base name.
pub const DEFAULT_EXPORT_BASE: &str = "overlayz-nft";

/// PNG snapshot of a rendered surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// Suggested download name, `<base>.png`.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// `data:image/png;base64,...` form of the encoded bytes.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

/// `<base>.png`, falling back to [`DEFAULT_EXPORT_BASE`] for blank names.
///
/// Path separators are replaced so the name cannot escape the target directory.
pub fn export_file_name(file_name_base: &str) -> String {
    let base = file_name_base.trim();
    let base = if base.is_empty() {
        DEFAULT_EXPORT_BASE
    } else {
        base
    };
    let safe: String = base
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.png")
}

/// Encode the surface as a straight-alpha RGBA8 PNG.
pub fn encode_png(surface: &Surface) -> OverlayzResult<Vec<u8>> {
    let rgba = surface.to_straight_rgba8();
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), rgba)
        .ok_or_else(|| OverlayzError::export("surface buffer does not match its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")
        .map_err(|e| OverlayzError::export(format!("{e:#}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
