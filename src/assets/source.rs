use std::{path::PathBuf, sync::Arc};

use base64::Engine as _;

use crate::foundation::error::{OverlayzError, OverlayzResult};

/// Public gateway used when content-addressed URIs are rewritten for fetching.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io";

/// Where image bytes come from.
///
/// The engine never interprets URL schemes itself; translating `ipfs://` and friends is done
/// with [`resolve_gateway_url`] before a source reaches the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetchable URL (`data:`, `file://`, `http(s)://`, or a relative asset path).
    Url(String),
    /// Local filesystem path.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// [`ImageSource::Url`] from anything string-like.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// [`ImageSource::Bytes`] from an owned buffer.
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Short human label for logs; never includes inline payloads.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(u) if u.starts_with("data:") => {
                let head = u.split_once(',').map_or(u.as_str(), |(h, _)| h);
                format!("{head},<{} bytes>", u.len())
            }
            Self::Url(u) => u.clone(),
            Self::Path(p) => p.display().to_string(),
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        Self::Url(value.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        Self::Url(value)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

/// Rewrite content-addressed `ipfs://` URIs to `<gateway>/ipfs/<cid>`; other URIs pass through.
///
/// Both `ipfs://<cid>/path` and the legacy `ipfs://ipfs/<cid>/path` forms are accepted.
pub fn resolve_gateway_url(uri: &str, gateway: &str) -> String {
    let uri = uri.trim();
    let Some(rest) = uri.strip_prefix("ipfs://") else {
        return uri.to_string();
    };
    let rest = rest.strip_prefix("ipfs/").unwrap_or(rest);
    format!("{}/ipfs/{}", gateway.trim_end_matches('/'), rest)
}

/// Decoded payload of a `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type; `text/plain` when omitted.
    pub media_type: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Parse `data:[<media type>][;base64],<payload>`.
pub fn parse_data_url(url: &str) -> OverlayzResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| OverlayzError::image_load("not a data: url"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| OverlayzError::image_load("data: url has no ',' separator"))?;

    let (media_type, is_base64) = match header.strip_suffix(";base64") {
        Some(mt) => (mt, true),
        None => (header, false),
    };
    let media_type = if media_type.is_empty() {
        "text/plain".to_string()
    } else {
        media_type.to_string()
    };

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| OverlayzError::image_load(format!("data: url base64 payload: {e}")))?
    } else {
        percent_decode(payload)?
    };

    Ok(DataUrl { media_type, bytes })
}

fn percent_decode(s: &str) -> OverlayzResult<Vec<u8>> {
    let raw = s.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| OverlayzError::image_load("bad percent escape in data: url"))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
