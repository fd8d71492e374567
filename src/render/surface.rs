use crate::foundation::{
    core::{HostRegion, Rgba8Premul, SurfaceSize},
    math::unpremultiply_rgba8_in_place,
};

/// Premultiplied RGBA8 pixel buffer the engine renders into and exports from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    size: SurfaceSize,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            data: vec![0; size.pixel_count() * 4],
        }
    }

    /// Pixel dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Reallocate to `size`; contents become transparent.
    pub(crate) fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.data.clear();
        self.data.resize(size.pixel_count() * 4, 0);
    }

    pub(crate) fn clear(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        if rgba == [0, 0, 0, 0] {
            self.data.fill(0);
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Copy of the pixels converted to straight (non-premultiplied) alpha.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Surface dimensions for an image of `image_width` x `image_height` hosted in `region`.
///
/// The aspect ratio is preserved. When the image is proportionally wider than the region the
/// width is capped (by the region width and `max_edge`) and the height derived; otherwise the
/// height is capped and the width derived. Fractional results are truncated, never below 1px.
pub fn fit_surface(
    image_width: u32,
    image_height: u32,
    region: HostRegion,
    max_edge: u32,
) -> SurfaceSize {
    let image_ratio = f64::from(image_width.max(1)) / f64::from(image_height.max(1));
    let region_ratio = region.aspect_ratio();

    let (w, h) = if image_ratio > region_ratio {
        let w = f64::from(region.width.min(max_edge));
        (w, w / image_ratio)
    } else {
        let h = f64::from(region.height.min(max_edge));
        (h * image_ratio, h)
    };

    SurfaceSize::new(truncate_px(w), truncate_px(h))
}

fn truncate_px(v: f64) -> u32 {
    if !v.is_finite() || v < 1.0 {
        return 1;
    }
    v.min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
