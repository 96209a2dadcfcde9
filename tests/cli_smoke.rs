use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgba, RgbaImage};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "veneer_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, img: &RgbaImage) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

fn fixture_root(name: &str) -> PathBuf {
    let root = temp_dir(name);
    let slab = RgbaImage::from_fn(600, 600, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    write_png(&root.join("slabs").join("verde.png"), &slab);
    write_png(
        &root.join("mockups").join("bathroom.png"),
        &RgbaImage::from_pixel(400, 320, Rgba([210, 210, 210, 255])),
    );
    root
}

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_veneer")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "veneer.exe"
            } else {
                "veneer"
            });
            p
        })
}

#[test]
fn cli_tile_writes_a_capped_square_texture() {
    let root = fixture_root("cli_tile");
    let out = root.join("tile.png");

    let status = Command::new(exe())
        .arg("--root")
        .arg(&root)
        .args(["tile", "slabs/verde.png", "-o"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(out.exists());

    // 600x600 is Medium/Balanced: 5 repetitions of a 2-cell unit, downscaled
    // to fit the 2048px cap (600 * 2048 / 6000 = 204px per cell).
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (2040, 2040));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn cli_preview_flattens_to_the_mockup_dimensions() {
    let root = fixture_root("cli_preview");
    let out = root.join("preview.png");

    let status = Command::new(exe())
        .arg("--root")
        .arg(&root)
        .args(["preview", "slabs/verde.png", "--mockup", "bathroom", "-o"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (400, 320));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn cli_classify_prints_the_recipe_as_json() {
    let root = fixture_root("cli_classify");

    let output = Command::new(exe())
        .arg("--root")
        .arg(&root)
        .args(["classify", "slabs/verde.png"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["width"], 600);
    assert_eq!(v["classification"]["size"], "Medium");
    assert_eq!(v["classification"]["aspect"], "Balanced");
    assert_eq!(v["recipe"]["method"], "Enhanced");
    assert_eq!(v["recipe"]["repetition"], 5);
    assert_eq!(v["recipe"]["background_size_px"], 200);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn cli_layered_preview_prints_the_css_description() {
    let root = fixture_root("cli_layered");

    let output = Command::new(exe())
        .arg("--root")
        .arg(&root)
        .args(["preview", "slabs/verde.png", "--mockup", "bathroom", "--layered"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["base_image"], "mockups/bathroom.png");
    let layers = v["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0]["size_px"], 200);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn cli_mockups_lists_the_builtins() {
    let output = Command::new(exe()).arg("mockups").output().unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["bathroom", "living-room"]);
}
