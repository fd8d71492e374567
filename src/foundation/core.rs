use crate::foundation::error::{OverlayzError, OverlayzResult};

pub use kurbo::{Point, Rect, Vec2};

/// Available display area hosting the surface, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HostRegion {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl HostRegion {
    /// Region of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A region with a zero edge cannot host a surface.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height.
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl std::str::FromStr for HostRegion {
    type Err = OverlayzError;

    /// Parse `WIDTHxHEIGHT`, e.g. `800x600`.
    fn from_str(s: &str) -> OverlayzResult<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| OverlayzError::validation(format!("region '{s}' is not WxH")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| OverlayzError::validation(format!("region '{s}': {e}")))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

/// Pixel dimensions of the drawable surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Size of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Rectangle from the origin to `(width, height)`.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Center point of [`bounds`](Self::bounds).
    pub fn center(self) -> Point {
        self.bounds().center()
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        Self {
            r: crate::foundation::math::mul_div255_u8(u16::from(r), a16),
            g: crate::foundation::math::mul_div255_u8(u16::from(g), a16),
            b: crate::foundation::math::mul_div255_u8(u16::from(b), a16),
            a,
        }
    }

    /// `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba8Premul {
    fn default() -> Self {
        Self::transparent()
    }
}
