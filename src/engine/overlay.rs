use crate::assets::{decode::DecodedImage, source::ImageSource};

/// Selectable decoration template.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable identifier; an applied overlay carries the same id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Image URL or relative asset path.
    #[serde(alias = "imgSrc")]
    pub image_source: String,
}

impl CatalogEntry {
    /// Entry with the given id, display name and image reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>, image_source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_source: image_source.into(),
        }
    }

    /// Image reference as a loadable source.
    pub fn source(&self) -> ImageSource {
        ImageSource::Url(self.image_source.clone())
    }
}

/// A catalog entry placed on the surface with its own transform.
///
/// Instances handed out by the engine are snapshots; mutating them does not touch engine state.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// Id of the catalog entry this instance came from.
    pub id: String,
    /// Display name copied from the catalog entry.
    pub name: String,
    /// Decoded sticker pixels.
    #[serde(skip)]
    pub image: DecodedImage,
    /// Horizontal shift from the centered position, in surface pixels.
    pub offset_x: i32,
    /// Vertical shift from the centered position, in surface pixels.
    pub offset_y: i32,
    /// Size relative to the surface; 1.0 covers it exactly.
    pub scale: f64,
    /// Draw order; higher draws on top. Assigned once at insertion, never renumbered.
    pub stacking_order: u64,
}

impl Overlay {
    pub(crate) fn new(entry: &CatalogEntry, image: DecodedImage, stacking_order: u64) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            image,
            offset_x: 0,
            offset_y: 0,
            scale: 1.0,
            stacking_order,
        }
    }

    pub(crate) fn apply(&mut self, patch: TransformPatch) {
        if let Some(x) = patch.offset_x {
            self.offset_x = x;
        }
        if let Some(y) = patch.offset_y {
            self.offset_y = y;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
    }
}

/// Sparse transform update; `None` fields are left unchanged.
///
/// No bounds are enforced: overlays may be pushed off the surface or scaled to zero or below.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformPatch {
    /// New horizontal offset.
    pub offset_x: Option<i32>,
    /// New vertical offset.
    pub offset_y: Option<i32>,
    /// New scale.
    pub scale: Option<f64>,
}

impl TransformPatch {
    /// Patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both offsets.
    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = Some(x);
        self.offset_y = Some(y);
        self
    }

    /// Set the horizontal offset.
    pub fn offset_x(mut self, x: i32) -> Self {
        self.offset_x = Some(x);
        self
    }

    /// Set the vertical offset.
    pub fn offset_y(mut self, y: i32) -> Self {
        self.offset_y = Some(y);
        self
    }

    /// Set the scale.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.offset_x.is_none() && self.offset_y.is_none() && self.scale.is_none()
    }
}
