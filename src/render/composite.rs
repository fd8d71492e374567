use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite `src` over the 4-byte pixel at the start of `dst`.
pub(crate) fn over_pixel_in_place(dst: &mut [u8], src: PremulRgba8) {
    if src[3] == 255 {
        dst[..4].copy_from_slice(&src);
        return;
    }
    let out = over([dst[0], dst[1], dst[2], dst[3]], src, 1.0);
    dst[..4].copy_from_slice(&out);
}
