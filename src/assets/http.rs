use std::{path::PathBuf, time::Duration};

use anyhow::Context;

use crate::{
    assets::{
        loader::{ImageLoader, LocalLoader},
        source::{DEFAULT_IPFS_GATEWAY, ImageSource, resolve_gateway_url},
    },
    foundation::error::{OverlayzError, OverlayzResult},
};

/// Upper bound for a single remote payload.
pub const DEFAULT_MAX_REMOTE_BYTES: u64 = 32 * 1024 * 1024;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Loader that fetches `http(s)://` sources and rewrites `ipfs://` through a gateway.
///
/// Every other source is handed to an inner [`LocalLoader`]. Requests are blocking; the future
/// resolves once the whole body has been read.
#[derive(Clone)]
pub struct HttpLoader {
    agent: ureq::Agent,
    local: LocalLoader,
    gateway: String,
    max_bytes: u64,
}

impl std::fmt::Debug for HttpLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLoader")
            .field("local", &self.local)
            .field("gateway", &self.gateway)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpLoader {
    /// Loader with a 30s request timeout and the public IPFS gateway.
    pub fn new() -> Self {
        Self {
            agent: agent_with_timeout(DEFAULT_TIMEOUT),
            local: LocalLoader::new(),
            gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            max_bytes: DEFAULT_MAX_REMOTE_BYTES,
        }
    }

    /// Resolve non-remote relative sources against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local = LocalLoader::with_root(root);
        self
    }

    /// Gateway used for `ipfs://` sources.
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Per-request timeout covering connect, headers and body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = agent_with_timeout(timeout);
        self
    }

    /// Refuse bodies larger than `max_bytes`.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Gateway `ipfs://` sources are rewritten to.
    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    fn fetch(&self, url: &str) -> OverlayzResult<Vec<u8>> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .with_context(|| format!("fetch '{url}'"))
            .map_err(OverlayzError::image_load_from)?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.max_bytes)
            .read_to_vec()
            .with_context(|| format!("read body of '{url}'"))
            .map_err(OverlayzError::image_load_from)?;
        tracing::debug!(url, bytes = bytes.len(), "remote image fetched");
        Ok(bytes)
    }
}

fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl ImageLoader for HttpLoader {
    async fn load(&self, source: &ImageSource) -> OverlayzResult<Vec<u8>> {
        match source {
            ImageSource::Url(url) if url.starts_with("ipfs://") => {
                self.fetch(&resolve_gateway_url(url, &self.gateway))
            }
            ImageSource::Url(url) if is_remote(url) => self.fetch(url),
            other => self.local.load(other).await,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/http.rs"]
mod tests;
