use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::{
        core::{Rgba8Premul, SurfaceSize},
        error::{OverlayzError, OverlayzResult},
    },
    render::draw::SampleFilter,
};

/// Longest surface edge, in pixels, regardless of how large the hosting region is.
pub const DEFAULT_MAX_EDGE: u32 = 800;
/// Surface size before any base image has been set.
pub const DEFAULT_PLACEHOLDER: SurfaceSize = SurfaceSize {
    width: 600,
    height: 600,
};

/// Options controlling surface sizing and rendering.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOpts {
    /// Upper bound for either surface edge.
    pub max_edge: u32,
    /// Surface size right after `initialize`.
    pub placeholder: SurfaceSize,
    /// Straight-alpha RGBA8 color the surface is cleared to before every render.
    pub clear_rgba: [u8; 4],
    /// Resampling used when stretching the base image and overlays.
    pub filter: SampleFilter,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            max_edge: DEFAULT_MAX_EDGE,
            placeholder: DEFAULT_PLACEHOLDER,
            clear_rgba: [0, 0, 0, 0],
            filter: SampleFilter::default(),
        }
    }
}

impl EngineOpts {
    /// Set [`max_edge`](Self::max_edge).
    pub fn with_max_edge(mut self, max_edge: u32) -> Self {
        self.max_edge = max_edge;
        self
    }

    /// Set [`placeholder`](Self::placeholder).
    pub fn with_placeholder(mut self, placeholder: SurfaceSize) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set [`clear_rgba`](Self::clear_rgba).
    pub fn with_clear_rgba(mut self, clear_rgba: [u8; 4]) -> Self {
        self.clear_rgba = clear_rgba;
        self
    }

    /// Set [`filter`](Self::filter).
    pub fn with_filter(mut self, filter: SampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Reject a zero `max_edge` or an empty placeholder.
    pub fn validate(&self) -> OverlayzResult<()> {
        if self.max_edge == 0 {
            return Err(OverlayzError::validation("max_edge must be > 0"));
        }
        if self.placeholder.width == 0 || self.placeholder.height == 0 {
            return Err(OverlayzError::validation(
                "placeholder surface must be at least 1x1",
            ));
        }
        Ok(())
    }

    /// Parse and validate options; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> OverlayzResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| OverlayzError::validation(format!("engine options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a JSON file.
    pub fn from_path(path: &Path) -> OverlayzResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read engine options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub(crate) fn clear_color(&self) -> Rgba8Premul {
        let [r, g, b, a] = self.clear_rgba;
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}
