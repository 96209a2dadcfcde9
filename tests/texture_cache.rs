use std::io::Cursor;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use veneer::{
    FsImageLoader, ImageLoader, PreparedImage, Provenance, TextureCache, VeneerError,
    build_texture, classify, normalize_source, select_recipe, source_id,
};

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "veneer_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &std::path::Path, img: &RgbaImage) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

#[test]
fn fs_loader_decodes_each_source_once() {
    let tmp = temp_dir("decode_once");
    write_png(
        &tmp.join("slab.png"),
        &RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255])),
    );

    let mut loader = FsImageLoader::new(&tmp);
    let id = source_id(&normalize_source("slab.png").unwrap());

    let a = loader.load("slab.png").unwrap();
    let b = loader.load("./slab.png").unwrap();
    assert_eq!(loader.decode_count(id), 1);
    assert_eq!(a.dims, b.dims);
    assert_eq!(a.provenance, Provenance::Local);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn fs_loader_folds_windows_separators_into_one_identity() {
    let tmp = temp_dir("separators");
    write_png(
        &tmp.join("slabs").join("verde.png"),
        &RgbaImage::from_pixel(2, 2, Rgba([7, 8, 9, 255])),
    );

    let mut loader = FsImageLoader::new(&tmp);
    loader.load("slabs/verde.png").unwrap();
    loader.load("slabs\\verde.png").unwrap();

    let id = source_id(&normalize_source("slabs/verde.png").unwrap());
    assert_eq!(loader.decode_count(id), 1);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn fs_loader_invalidation_forces_a_fresh_decode() {
    let tmp = temp_dir("invalidate");
    write_png(
        &tmp.join("slab.png"),
        &RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255])),
    );

    let mut loader = FsImageLoader::new(&tmp);
    let id = source_id(&normalize_source("slab.png").unwrap());

    loader.load("slab.png").unwrap();
    loader.invalidate(id);
    loader.load("slab.png").unwrap();
    assert_eq!(loader.decode_count(id), 2);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn fs_loader_missing_file_is_a_decode_error() {
    let tmp = temp_dir("missing");
    std::fs::create_dir_all(&tmp).unwrap();

    let mut loader = FsImageLoader::new(&tmp);
    let err = loader.load("nope.png").unwrap_err();
    assert!(matches!(err, VeneerError::Decode(_)));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn source_identity_is_cross_platform() {
    assert_eq!(
        source_id(&normalize_source("a/b.png").unwrap()),
        source_id(&normalize_source("a\\b.png").unwrap())
    );
    assert_eq!(normalize_source("a\\b.png").unwrap(), "a/b.png");
    assert_ne!(source_id("a/b.png"), source_id("a/c.png"));
}

#[test]
fn texture_cache_returns_the_same_allocation_without_rebuilding() {
    let prepared = PreparedImage::new(
        RgbaImage::from_pixel(64, 64, Rgba([120, 110, 100, 255])),
        Provenance::Local,
    )
    .unwrap();
    let id = source_id("slab.png");
    let recipe = select_recipe(classify(64, 64).unwrap());
    let mut cache = TextureCache::new();

    let a = cache
        .get_or_build(id, || build_texture(&prepared, id, recipe))
        .unwrap();
    let b = cache
        .get_or_build(id, || panic!("cached identity must not rebuild"))
        .unwrap();

    assert!(Arc::ptr_eq(&a.pixels, &b.pixels));
    assert!(Arc::ptr_eq(&a.jpeg, &b.jpeg));
    assert_eq!(cache.build_count(id), 1);
}

#[test]
fn texture_cache_failures_are_retried() {
    let prepared = PreparedImage::new(
        RgbaImage::from_pixel(16, 16, Rgba([1, 1, 1, 255])),
        Provenance::Local,
    )
    .unwrap();
    let id = source_id("flaky.png");
    let recipe = select_recipe(classify(16, 16).unwrap());
    let mut cache = TextureCache::new();

    let err = cache.get_or_build(id, || Err(VeneerError::decode("transient read failure")));
    assert!(err.is_err());
    assert_eq!(cache.build_count(id), 0);
    assert!(cache.is_empty());

    cache
        .get_or_build(id, || build_texture(&prepared, id, recipe))
        .unwrap();
    assert_eq!(cache.build_count(id), 1);
    assert_eq!(cache.len(), 1);
}
