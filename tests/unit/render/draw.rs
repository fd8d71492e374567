use super::*;
use crate::foundation::core::Rgba8Premul;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DecodedImage {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    DecodedImage::from_premul_rgba8(width, height, data).unwrap()
}

fn checker(width: u32, height: u32) -> DecodedImage {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) % 2 * 255) as u8;
            data.extend_from_slice(&[v, 0, 255 - v, 255]);
        }
    }
    DecodedImage::from_premul_rgba8(width, height, data).unwrap()
}

fn count_opaque(surface: &Surface) -> usize {
    surface.data().chunks_exact(4).filter(|p| p[3] != 0).count()
}

#[test]
fn default_transform_covers_whole_surface() {
    let size = SurfaceSize::new(40, 30);
    let rect = overlay_rect(size, 0, 0, 1.0);
    assert_eq!(rect, Rect::new(0.0, 0.0, 40.0, 30.0));
}

#[test]
fn half_scale_is_centered_and_offsets_shift() {
    let size = SurfaceSize::new(40, 20);
    assert_eq!(overlay_rect(size, 0, 0, 0.5), Rect::new(10.0, 5.0, 30.0, 15.0));
    assert_eq!(
        overlay_rect(size, -3, 4, 0.5),
        Rect::new(7.0, 9.0, 27.0, 19.0)
    );
}

#[test]
fn identity_stretch_copies_pixels_exactly() {
    let img = checker(5, 3);
    for filter in [SampleFilter::Nearest, SampleFilter::Bilinear] {
        let mut surface = Surface::new(SurfaceSize::new(5, 3));
        let bounds = surface.size().bounds();
        draw_image(&mut surface, &img, bounds, filter);
        assert_eq!(surface.data(), img.rgba8_premul.as_slice(), "{filter:?}");
    }
}

#[test]
fn nearest_upscale_repeats_source_pixels() {
    let img = checker(2, 1);
    let mut surface = Surface::new(SurfaceSize::new(4, 2));
    let bounds = surface.size().bounds();
    draw_image(&mut surface, &img, bounds, SampleFilter::Nearest);
    assert_eq!(surface.pixel(0, 0), Some(img.pixel(0, 0)));
    assert_eq!(surface.pixel(1, 1), Some(img.pixel(0, 0)));
    assert_eq!(surface.pixel(2, 0), Some(img.pixel(1, 0)));
    assert_eq!(surface.pixel(3, 1), Some(img.pixel(1, 0)));
}

#[test]
fn off_surface_parts_are_clipped() {
    let img = solid(4, 4, [255, 0, 0, 255]);
    let mut surface = Surface::new(SurfaceSize::new(10, 10));
    draw_image(
        &mut surface,
        &img,
        Rect::new(-5.0, -5.0, 5.0, 5.0),
        SampleFilter::Nearest,
    );
    assert_eq!(count_opaque(&surface), 25);
    assert_eq!(surface.pixel(4, 4), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 0]));
}

#[test]
fn fully_outside_and_degenerate_boxes_draw_nothing() {
    let img = solid(2, 2, [0, 255, 0, 255]);
    let mut surface = Surface::new(SurfaceSize::new(8, 8));
    for rect in [
        Rect::new(20.0, 20.0, 30.0, 30.0),
        Rect::new(-30.0, 0.0, -10.0, 8.0),
        Rect::new(4.0, 4.0, 4.0, 4.0),
        overlay_rect(surface.size(), 0, 0, 0.0),
        overlay_rect(surface.size(), 0, 0, f64::NAN),
    ] {
        draw_image(&mut surface, &img, rect, SampleFilter::Bilinear);
    }
    assert_eq!(count_opaque(&surface), 0);
}

#[test]
fn negative_scale_is_normalized_to_absolute_size() {
    let size = SurfaceSize::new(40, 20);
    assert_eq!(overlay_rect(size, 0, 0, -1.0), Rect::new(0.0, 0.0, 40.0, 20.0));
    assert_eq!(overlay_rect(size, 2, 0, -0.5), overlay_rect(size, 2, 0, 0.5));

    let img = solid(2, 2, [0, 255, 0, 255]);
    let mut surface = Surface::new(SurfaceSize::new(8, 8));
    let rect = overlay_rect(surface.size(), 0, 0, -1.0);
    draw_image(&mut surface, &img, rect, SampleFilter::Nearest);
    assert_eq!(count_opaque(&surface), 64);
}

#[test]
fn transparent_source_leaves_destination() {
    let img = solid(2, 2, [0, 0, 0, 0]);
    let mut surface = Surface::new(SurfaceSize::new(2, 2));
    surface.clear(Rgba8Premul::from_straight_rgba(1, 2, 3, 255));
    let before = surface.clone();
    let bounds = surface.size().bounds();
    draw_image(&mut surface, &img, bounds, SampleFilter::Bilinear);
    assert_eq!(surface, before);
}

#[test]
fn bilinear_downscale_averages() {
    let img = checker(2, 2);
    let mut surface = Surface::new(SurfaceSize::new(1, 1));
    let bounds = surface.size().bounds();
    draw_image(&mut surface, &img, bounds, SampleFilter::Bilinear);
    let px = surface.pixel(0, 0).unwrap();
    assert!(px[0].abs_diff(128) <= 1, "{px:?}");
    assert!(px[2].abs_diff(128) <= 1, "{px:?}");
    assert_eq!(px[3], 255);
}
