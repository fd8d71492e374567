use base64::Engine as _;

use super::*;
use crate::assets::source::DEFAULT_IPFS_GATEWAY;

fn b64(s: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(s)
}

fn hex(s: &str) -> String {
    s.bytes().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn base64_ipfs_link() {
    let meta = decode_metadata_blob(&b64("ipfs://bafymeta/1.json"));
    assert_eq!(meta, TokenMetadata::Link("ipfs://bafymeta/1.json".to_string()));
    assert_eq!(
        meta.link_url(DEFAULT_IPFS_GATEWAY).as_deref(),
        Some("https://ipfs.io/ipfs/bafymeta/1.json")
    );
    assert_eq!(meta.image_uri(), None);
}

#[test]
fn hex_inline_json_with_image() {
    let meta = decode_metadata_blob(&hex(r#"{"name":"Frog #7","image":"ipfs://bafyimg"}"#));
    assert_eq!(meta.image_uri(), Some("ipfs://bafyimg"));
    assert_eq!(
        meta.image_source(DEFAULT_IPFS_GATEWAY),
        Some(ImageSource::Url("https://ipfs.io/ipfs/bafyimg".to_string()))
    );
}

#[test]
fn image_url_fallback_field() {
    let meta = decode_metadata_blob(&b64(r#"{"image_url":"https://cdn.example/x.png"}"#));
    assert_eq!(meta.image_uri(), Some("https://cdn.example/x.png"));
}

#[test]
fn garbage_and_empty_blobs_yield_empty() {
    assert_eq!(decode_metadata_blob(""), TokenMetadata::Empty);
    assert_eq!(decode_metadata_blob("!!!not-base64!!!"), TokenMetadata::Empty);
    assert_eq!(decode_metadata_blob(&b64("plain words")), TokenMetadata::Empty);
    assert_eq!(decode_metadata_blob(&b64("[1,2]")), TokenMetadata::Empty);
}
