use crate::{
    assets::decode::DecodedImage,
    foundation::core::{Rect, SurfaceSize},
    render::{
        composite::{PremulRgba8, over_pixel_in_place},
        surface::Surface,
    },
};

/// Resampling used when an image is stretched into its destination box.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SampleFilter {
    /// Pick the source pixel under the destination pixel center.
    Nearest,
    /// Interpolate the four nearest source pixels (clamped at the edges).
    #[default]
    Bilinear,
}

/// Destination box of an overlay: centered on the surface, sized `scale` times the surface,
/// then shifted by the offsets.
///
/// The box is normalized, so a negative scale draws at its absolute size. Zero or NaN scale
/// yields an empty box.
pub fn overlay_rect(size: SurfaceSize, offset_x: i32, offset_y: i32, scale: f64) -> Rect {
    let surface_w = f64::from(size.width);
    let surface_h = f64::from(size.height);
    let w = surface_w * scale;
    let h = surface_h * scale;
    let center = size.center();
    let x0 = center.x - w / 2.0 + f64::from(offset_x);
    let y0 = center.y - h / 2.0 + f64::from(offset_y);
    Rect::new(x0, y0, x0 + w, y0 + h).abs()
}

/// Stretch `image` into `dest` (surface pixel space) and composite it source-over.
///
/// Destination pixels are included when their center lies inside `dest`; anything outside the
/// surface is clipped. Empty or non-finite boxes draw nothing.
pub(crate) fn draw_image(surface: &mut Surface, image: &DecodedImage, dest: Rect, filter: SampleFilter) {
    let (dw, dh) = (dest.width(), dest.height());
    if !(dw > 0.0 && dh > 0.0) || !dest.x0.is_finite() || !dest.y0.is_finite() {
        return;
    }

    let size = surface.size();
    let Some((px0, px1)) = covered_span(dest.x0, dest.x1, size.width) else {
        return;
    };
    let Some((py0, py1)) = covered_span(dest.y0, dest.y1, size.height) else {
        return;
    };

    let sx_scale = f64::from(image.width) / dw;
    let sy_scale = f64::from(image.height) / dh;
    let stride = size.width as usize * 4;
    let data = surface.data_mut();

    for py in py0..py1 {
        let v = (f64::from(py) + 0.5 - dest.y0) * sy_scale;
        let row = &mut data[py as usize * stride..(py as usize + 1) * stride];
        for px in px0..px1 {
            let u = (f64::from(px) + 0.5 - dest.x0) * sx_scale;
            let src = match filter {
                SampleFilter::Nearest => sample_nearest(image, u, v),
                SampleFilter::Bilinear => sample_bilinear(image, u, v),
            };
            if src[3] == 0 {
                continue;
            }
            over_pixel_in_place(&mut row[px as usize * 4..], src);
        }
    }
}

/// Half-open pixel range whose centers fall in `[lo, hi)`, clipped to `[0, limit)`.
fn covered_span(lo: f64, hi: f64, limit: u32) -> Option<(u32, u32)> {
    let limit_f = f64::from(limit);
    let start = (lo - 0.5).ceil().clamp(0.0, limit_f);
    let end = (hi - 0.5).ceil().clamp(0.0, limit_f);
    if !(end > start) {
        return None;
    }
    Some((start as u32, end as u32))
}

fn sample_nearest(image: &DecodedImage, u: f64, v: f64) -> PremulRgba8 {
    let x = clamp_index(u.floor(), image.width);
    let y = clamp_index(v.floor(), image.height);
    image.pixel(x, y)
}

fn sample_bilinear(image: &DecodedImage, u: f64, v: f64) -> PremulRgba8 {
    let fx = u - 0.5;
    let fy = v - 0.5;
    let x0f = fx.floor();
    let y0f = fy.floor();
    let tx = fx - x0f;
    let ty = fy - y0f;

    let x0 = clamp_index(x0f, image.width);
    let x1 = clamp_index(x0f + 1.0, image.width);
    let y0 = clamp_index(y0f, image.height);
    let y1 = clamp_index(y0f + 1.0, image.height);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let w00 = (1.0 - tx) * (1.0 - ty);
    let w10 = tx * (1.0 - ty);
    let w01 = (1.0 - tx) * ty;
    let w11 = tx * ty;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let c = f64::from(p00[i]) * w00
            + f64::from(p10[i]) * w10
            + f64::from(p01[i]) * w01
            + f64::from(p11[i]) * w11;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    // Premultiplied invariant: color never exceeds alpha.
    for i in 0..3 {
        out[i] = out[i].min(out[3]);
    }
    out
}

fn clamp_index(v: f64, len: u32) -> u32 {
    let max = f64::from(len.saturating_sub(1));
    v.clamp(0.0, max) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
