use super::*;

#[test]
fn wide_image_in_square_region_is_width_constrained() {
    let s = fit_surface(1600, 800, HostRegion::new(500, 500), 800);
    assert!(s.width <= 500);
    assert_eq!(s, SurfaceSize::new(500, 250));
    assert_eq!(f64::from(s.height), f64::from(s.width) / 2.0);
}

#[test]
fn tall_image_is_height_constrained() {
    let s = fit_surface(500, 1000, HostRegion::new(600, 600), 800);
    assert_eq!(s, SurfaceSize::new(300, 600));
}

#[test]
fn max_edge_caps_large_regions() {
    let s = fit_surface(2000, 1000, HostRegion::new(1920, 1080), 800);
    assert_eq!(s, SurfaceSize::new(800, 400));

    let s = fit_surface(1000, 2000, HostRegion::new(1920, 1080), 800);
    assert_eq!(s, SurfaceSize::new(400, 800));
}

#[test]
fn equal_ratios_take_height_branch() {
    let s = fit_surface(300, 300, HostRegion::new(500, 500), 800);
    assert_eq!(s, SurfaceSize::new(500, 500));
}

#[test]
fn fractional_sizes_truncate_and_never_hit_zero() {
    let s = fit_surface(3, 1, HostRegion::new(100, 100), 800);
    assert_eq!(s, SurfaceSize::new(100, 33));

    let s = fit_surface(10_000, 1, HostRegion::new(100, 100), 800);
    assert_eq!(s, SurfaceSize::new(100, 1));
}

#[test]
fn clear_and_straight_conversion() {
    let mut surface = Surface::new(SurfaceSize::new(2, 1));
    assert!(surface.data().iter().all(|&b| b == 0));

    surface.clear(Rgba8Premul::from_straight_rgba(200, 100, 0, 128));
    assert_eq!(surface.pixel(1, 0), Some([100, 50, 0, 128]));
    assert_eq!(surface.pixel(2, 0), None);

    let straight = surface.to_straight_rgba8();
    assert!(straight[0].abs_diff(200) <= 1);
    assert_eq!(straight[3], 128);
}

#[test]
fn resize_reallocates_transparent() {
    let mut surface = Surface::new(SurfaceSize::new(1, 1));
    surface.clear(Rgba8Premul::from_straight_rgba(1, 2, 3, 255));
    surface.resize(SurfaceSize::new(3, 2));
    assert_eq!(surface.data().len(), 24);
    assert!(surface.data().iter().all(|&b| b == 0));
}
