//! Flattens a synthetic slab photo into the builtin bathroom mockup.
//!
//! Everything is generated in memory, so the demo needs no asset files. Run with
//! `cargo run --example preview_bathroom`; the preview lands in `target/`.

use image::{Rgba, RgbaImage};
use veneer::{MemoryImageLoader, PreviewOutput, PreviewRequest, Provenance, VisualizerSession};

fn synthetic_slab(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        let vein = ((fx * 9.0 + fy * 4.0).sin() * (fy * 13.0 - fx * 3.0).cos()).abs();
        let base = 92.0 + 36.0 * (fx * 3.2).sin().abs();
        let r = (base * 0.75 + 40.0 * vein).min(255.0) as u8;
        let g = (base + 70.0 * vein).min(255.0) as u8;
        let b = (base * 0.8 + 30.0 * vein).min(255.0) as u8;
        Rgba([r, g, b, 255])
    })
}

fn synthetic_bathroom(width: u32, height: u32) -> RgbaImage {
    let split = (height as f32 * 0.6) as u32;
    RgbaImage::from_fn(width, height, |x, y| {
        if y < split {
            // Tiled wall with grout lines.
            let shade = 226u8.saturating_sub((y * 18 / split.max(1)) as u8);
            let v = if x % 125 < 2 || y % 120 < 2 {
                shade.saturating_sub(12)
            } else {
                shade
            };
            Rgba([v, v, v.saturating_sub(4), 255])
        } else {
            // Banded floor.
            let band = ((x / 160) % 2) as u8 * 10;
            Rgba([168 + band, 158 + band, 148 + band, 255])
        }
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut loader = MemoryImageLoader::new();
    loader.insert(
        "slabs/verde-alpi.jpg",
        synthetic_slab(640, 480),
        Provenance::Local,
    )?;
    loader.insert(
        "mockups/bathroom.png",
        synthetic_bathroom(1000, 800),
        Provenance::Local,
    )?;

    let mut session = VisualizerSession::new(loader);
    let (output, report) = session.preview(&PreviewRequest {
        source: "slabs/verde-alpi.jpg".to_string(),
        product_name: "Verde Alpi".to_string(),
        mockup_id: "bathroom".to_string(),
        regions: vec![],
        flatten: true,
    })?;

    println!(
        "classified {:?}/{:?} -> {:?} with {} repetitions",
        report.classification.size,
        report.classification.aspect,
        report.recipe.method,
        report.recipe.repetition
    );

    let PreviewOutput::Bitmap(bitmap) = output else {
        anyhow::bail!("local sources should flatten");
    };

    let out_path = std::path::Path::new("target").join("preview_bathroom.png");
    image::save_buffer_with_format(
        &out_path,
        bitmap.pixels.as_raw(),
        bitmap.dims.width,
        bitmap.dims.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    eprintln!("wrote {}", out_path.display());
    Ok(())
}
