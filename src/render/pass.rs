use crate::{
    assets::decode::DecodedImage,
    foundation::core::Rgba8Premul,
    render::{
        draw::{SampleFilter, draw_image, overlay_rect},
        surface::Surface,
    },
};

/// One overlay as seen by the render pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OverlayLayer<'a> {
    pub(crate) image: &'a DecodedImage,
    pub(crate) offset_x: i32,
    pub(crate) offset_y: i32,
    pub(crate) scale: f64,
    pub(crate) stacking_order: u64,
}

/// Full redraw: clear, stretch the base over the whole surface, then overlays bottom to top.
///
/// Overlays are stably sorted by stacking order, so equal orders keep their slice order.
pub(crate) fn composite_frame(
    surface: &mut Surface,
    clear: Rgba8Premul,
    base: Option<&DecodedImage>,
    overlays: &[OverlayLayer<'_>],
    filter: SampleFilter,
) {
    surface.clear(clear);

    if let Some(base) = base {
        let bounds = surface.size().bounds();
        draw_image(surface, base, bounds, filter);
    }

    let mut ordered: Vec<&OverlayLayer<'_>> = overlays.iter().collect();
    ordered.sort_by_key(|layer| layer.stacking_order);

    for layer in ordered {
        let rect = overlay_rect(surface.size(), layer.offset_x, layer.offset_y, layer.scale);
        draw_image(surface, layer.image, rect, filter);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pass.rs"]
mod tests;
