use std::{
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::{
        decode::{DecodedImage, decode_image},
        source::{ImageSource, parse_data_url},
    },
    foundation::error::{OverlayzError, OverlayzResult},
};

/// Fetches the encoded bytes behind an [`ImageSource`].
///
/// Loading is the only suspending step in the engine. Implementations must either return the
/// complete byte payload or an error; the engine decodes and commits only after the future resolves.
pub trait ImageLoader {
    /// Fetch the encoded bytes for `source`.
    fn load(&self, source: &ImageSource) -> impl Future<Output = OverlayzResult<Vec<u8>>>;
}

/// Loader for sources that need no network: paths, `file://` and `data:` URLs, in-memory bytes.
///
/// Relative paths and bare URLs are resolved against `root` when one is set. Remote `http(s)`
/// and `ipfs://` URLs are refused; the `http` feature's `HttpLoader` fetches those.
#[derive(Clone, Debug, Default)]
pub struct LocalLoader {
    root: Option<PathBuf>,
}

impl LocalLoader {
    /// Loader resolving relative sources against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn read_path(&self, path: &Path) -> OverlayzResult<Vec<u8>> {
        let full = self.resolve(path);
        std::fs::read(&full)
            .with_context(|| format!("read image '{}'", full.display()))
            .map_err(OverlayzError::image_load_from)
    }

    fn load_url(&self, url: &str) -> OverlayzResult<Vec<u8>> {
        if url.starts_with("data:") {
            return Ok(parse_data_url(url)?.bytes);
        }
        if let Some(path) = url.strip_prefix("file://") {
            return self.read_path(Path::new(path));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(OverlayzError::image_load(format!(
                "remote url '{url}' needs a network loader"
            )));
        }
        if url.starts_with("ipfs://") {
            return Err(OverlayzError::image_load(format!(
                "unresolved content-addressed uri '{url}'"
            )));
        }
        self.read_path(Path::new(url))
    }
}

impl ImageLoader for LocalLoader {
    async fn load(&self, source: &ImageSource) -> OverlayzResult<Vec<u8>> {
        match source {
            ImageSource::Url(url) => self.load_url(url),
            ImageSource::Path(path) => self.read_path(path),
            ImageSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Fetch and decode `source` into premultiplied pixels.
pub async fn load_image<L: ImageLoader + ?Sized>(
    loader: &L,
    source: &ImageSource,
) -> OverlayzResult<DecodedImage> {
    let bytes = loader.load(source).await?;
    if bytes.is_empty() {
        return Err(OverlayzError::image_load(format!(
            "source '{}' is empty",
            source.describe()
        )));
    }
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
