use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "overlayz_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn in_memory_bytes_decode() {
    let loader = LocalLoader::new();
    let img = pollster::block_on(load_image(&loader, &ImageSource::from(png_bytes()))).unwrap();
    assert_eq!((img.width, img.height), (2, 1));
}

#[test]
fn data_url_decodes() {
    let url = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png_bytes())
    );
    let loader = LocalLoader::new();
    let img = pollster::block_on(load_image(&loader, &ImageSource::url(url))).unwrap();
    assert_eq!(img.pixel(1, 0), [0, 0, 255, 255]);
}

#[test]
fn relative_paths_resolve_against_root() {
    let tmp = temp_dir("loader_root");
    std::fs::create_dir_all(tmp.join("hats")).unwrap();
    std::fs::write(tmp.join("hats/crown.png"), png_bytes()).unwrap();

    let loader = LocalLoader::with_root(&tmp);
    let img = pollster::block_on(load_image(&loader, &"hats/crown.png".into())).unwrap();
    assert_eq!(img.width, 2);

    let file_url = format!("file://{}", tmp.join("hats/crown.png").display());
    let img = pollster::block_on(load_image(&LocalLoader::new(), &ImageSource::url(file_url)))
        .unwrap();
    assert_eq!(img.height, 1);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_file_is_image_load_error() {
    let loader = LocalLoader::with_root(temp_dir("loader_missing"));
    let err = pollster::block_on(load_image(&loader, &"nope.png".into())).unwrap_err();
    assert!(matches!(err, OverlayzError::ImageLoad(_)), "{err}");
}

#[test]
fn remote_and_ipfs_urls_are_refused() {
    let loader = LocalLoader::new();
    for url in ["https://example.invalid/a.png", "ipfs://bafy/a.png"] {
        let err = pollster::block_on(load_image(&loader, &ImageSource::url(url))).unwrap_err();
        assert!(matches!(err, OverlayzError::ImageLoad(_)), "{url}: {err}");
    }
}

#[test]
fn empty_payload_is_rejected() {
    let loader = LocalLoader::new();
    let err = pollster::block_on(load_image(&loader, &ImageSource::from(Vec::new()))).unwrap_err();
    assert!(err.to_string().contains("empty"));
}
