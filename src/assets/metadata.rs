use base64::Engine as _;

use crate::assets::source::{ImageSource, resolve_gateway_url};

/// Token metadata as stored on the ledger, after decoding the raw blob.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenMetadata {
    /// The blob points at an external metadata document.
    Link(String),
    /// The blob is the metadata document itself.
    Inline(serde_json::Value),
    /// Nothing usable could be decoded.
    Empty,
}

impl TokenMetadata {
    /// Image reference embedded in an inline document (`image`, then `image_url`).
    pub fn image_uri(&self) -> Option<&str> {
        let Self::Inline(doc) = self else {
            return None;
        };
        ["image", "image_url"]
            .iter()
            .find_map(|k| doc.get(*k).and_then(serde_json::Value::as_str))
            .filter(|s| !s.trim().is_empty())
    }

    /// Image reference rewritten for fetching through `gateway`.
    pub fn image_source(&self, gateway: &str) -> Option<ImageSource> {
        self.image_uri()
            .map(|uri| ImageSource::Url(resolve_gateway_url(uri, gateway)))
    }

    /// Metadata link rewritten for fetching through `gateway`.
    pub fn link_url(&self, gateway: &str) -> Option<String> {
        match self {
            Self::Link(url) => Some(resolve_gateway_url(url, gateway)),
            _ => None,
        }
    }
}

/// Decode a ledger metadata blob.
///
/// Index services hand the blob out base64-encoded; older payloads are hex. Strict hex is tried
/// first, then base64; the first decoding that yields UTF-8 text wins. Text that looks like a
/// URL becomes [`TokenMetadata::Link`], anything else is parsed as a JSON document.
pub fn decode_metadata_blob(blob: &str) -> TokenMetadata {
    let blob = blob.trim();
    if blob.is_empty() {
        return TokenMetadata::Empty;
    }

    let Some(text) = decode_hex_utf8(blob).or_else(|| decode_base64_utf8(blob)) else {
        tracing::debug!(len = blob.len(), "metadata blob is neither hex nor base64 utf-8");
        return TokenMetadata::Empty;
    };
    let text = text.trim();

    if text.starts_with("http") || text.starts_with("ipfs://") {
        return TokenMetadata::Link(text.to_string());
    }

    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(doc) if doc.is_object() => TokenMetadata::Inline(doc),
        Ok(_) => TokenMetadata::Empty,
        Err(e) => {
            tracing::debug!(error = %e, "metadata text is not a json document");
            TokenMetadata::Empty
        }
    }
}

fn decode_hex_utf8(s: &str) -> Option<String> {
    if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .ok()?;
    String::from_utf8(bytes).ok()
}

fn decode_base64_utf8(s: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(s).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/metadata.rs"]
mod tests;
