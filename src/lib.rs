//! Overlayz composites decorative sticker overlays on top of an NFT image.
//!
//! The API is session-oriented:
//!
//! - Create a [`CompositeEngine`] over an [`ImageLoader`] and [`EngineOpts`]
//! - [`CompositeEngine::initialize`] it against a [`HostRegion`]
//! - Set a base image, toggle overlays from an [`OverlayCatalog`], adjust their transforms
//! - Export the surface as a PNG through an [`ExportSink`]
//!
//! Every mutation re-renders the whole surface: clear, base, then overlays by ascending
//! stacking order. Pixels are premultiplied RGBA8 internally and un-premultiplied on export.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod engine;
mod foundation;
mod render;

/// Wallet connection capability for presentation layers.
pub mod wallet;

pub use crate::foundation::core::{HostRegion, Point, Rect, Rgba8Premul, SurfaceSize, Vec2};
pub use crate::foundation::error::{OverlayzError, OverlayzResult};

pub use crate::assets::decode::{DecodedImage, decode_image};
#[cfg(feature = "http")]
pub use crate::assets::http::{DEFAULT_MAX_REMOTE_BYTES, HttpLoader};
pub use crate::assets::loader::{ImageLoader, LocalLoader, load_image};
pub use crate::assets::metadata::{TokenMetadata, decode_metadata_blob};
pub use crate::assets::source::{
    DEFAULT_IPFS_GATEWAY, DataUrl, ImageSource, parse_data_url, resolve_gateway_url,
};

pub use crate::render::composite::{PremulRgba8, over};
pub use crate::render::draw::{SampleFilter, overlay_rect};
pub use crate::render::surface::{Surface, fit_surface};

pub use crate::encode::png::{DEFAULT_EXPORT_BASE, ExportedImage, encode_png, export_file_name};
pub use crate::encode::sink::{DownloadSink, ExportSink, InMemorySink};

pub use crate::engine::catalog::{CatalogCategory, OverlayCatalog};
pub use crate::engine::compositor::{CompositeEngine, OverlayLoad, OverlayRequest};
pub use crate::engine::config::{DEFAULT_MAX_EDGE, DEFAULT_PLACEHOLDER, EngineOpts};
pub use crate::engine::overlay::{CatalogEntry, Overlay, TransformPatch};
pub use crate::engine::ticket::{Commit, LoadSlot, LoadTicket};

pub use crate::wallet::{
    AccountId, InMemoryWallet, SubscriptionId, WalletEvent, WalletEventKind, WalletHandler,
    WalletProvider,
};
