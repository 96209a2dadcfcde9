use image::RgbaImage;

use crate::foundation::error::{VeneerError, VeneerResult};

/// Decode encoded image bytes into straight (non-premultiplied) RGBA8.
pub fn decode_image(bytes: &[u8]) -> VeneerResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| VeneerError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Encode pixels as a JPEG payload at `quality` (1..=100).
///
/// Alpha is dropped; JPEG carries no alpha channel and texture payloads are
/// opaque by contract.
pub fn encode_jpeg(pixels: &RgbaImage, quality: u8) -> VeneerResult<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(VeneerError::validation("jpeg quality must be in 1..=100"));
    }

    let rgb = image::DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| VeneerError::decode(format!("encode jpeg payload: {e}")))?;
    Ok(out)
}
