//! Blend math and the two composite realizations.
//!
//! A composite can be flattened into a bitmap (for download) or described as
//! CSS-style background layers (for on-screen preview). Both paint the same
//! thing: the texture repeated across each selected region at a fixed
//! background size, blended into the base photo, then lerped toward the base
//! by the region opacity. Flattening is gated on provenance: a cross-origin
//! source fails with a tainted-export error before any pixels move.

use std::sync::Arc;

use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    assets::PreparedImage,
    bookmatch::BookmatchedTexture,
    foundation::core::{PixelSize, RectPx},
    foundation::error::{VeneerError, VeneerResult},
    foundation::math::{lerp_u8, mul_div255_u8, mul_div255_u16},
    mockup::{BlendMode, Region},
};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Blend `tex` over `base` with `mode`, then lerp toward the result by
/// `opacity`. The base keeps its own alpha: painting changes color, not
/// coverage.
pub fn blend_pixel(
    base: StraightRgba8,
    tex: StraightRgba8,
    mode: BlendMode,
    opacity: f32,
) -> StraightRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || tex[3] == 0 {
        return base;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let t = mul_div255_u16(op, u16::from(tex[3]));
    if t == 0 {
        return base;
    }

    let ch: fn(u8, u8) -> u8 = match mode {
        BlendMode::Normal => normal_channel,
        BlendMode::Multiply => multiply_channel,
        BlendMode::Overlay => overlay_channel,
        BlendMode::Screen => screen_channel,
    };

    let mut out = base;
    for i in 0..3 {
        out[i] = lerp_u8(base[i], ch(base[i], tex[i]), t);
    }
    out
}

fn normal_channel(_base: u8, tex: u8) -> u8 {
    tex
}

fn multiply_channel(base: u8, tex: u8) -> u8 {
    mul_div255_u8(u16::from(base), u16::from(tex))
}

fn screen_channel(base: u8, tex: u8) -> u8 {
    255 - mul_div255_u8(255 - u16::from(base), 255 - u16::from(tex))
}

fn overlay_channel(base: u8, tex: u8) -> u8 {
    let b = u32::from(base);
    let t = u32::from(tex);
    if b < 128 {
        ((2 * b * t + 127) / 255) as u8
    } else {
        (255 - (2 * (255 - b) * (255 - t) + 127) / 255) as u8
    }
}

#[derive(Clone, Debug)]
/// Flattened output; dimensions equal the mockup base exactly.
pub struct CompositeBitmap {
    /// Bitmap dimensions.
    pub dims: PixelSize,
    /// Straight RGBA8 pixels.
    pub pixels: Arc<RgbaImage>,
}

/// Flatten the texture into every given region of the base photo.
///
/// Each `background_size_px`-square block of a region shows the whole
/// texture (nearest sampling, anchored at the region origin), matching the
/// CSS `background-size` behavior of the layered realization. Regions paint
/// in order; rows are processed in parallel.
#[tracing::instrument(skip(base, texture, regions))]
pub fn composite_bitmap(
    base: &PreparedImage,
    texture: &BookmatchedTexture,
    regions: &[Region],
) -> VeneerResult<RgbaImage> {
    if !base.provenance.exportable() {
        return Err(VeneerError::tainted_export(
            "mockup base is cross-origin; route it through the proxy or keep the layered preview",
        ));
    }
    if !texture.provenance.exportable() {
        return Err(VeneerError::tainted_export(
            "texture source is cross-origin; route it through the proxy or keep the layered preview",
        ));
    }

    let tile = texture.recipe.background_size_px;
    if tile == 0 {
        return Err(VeneerError::validation("background_size_px must be > 0"));
    }
    for region in regions {
        region.validate()?;
    }

    let dims = base.dims;
    let rects: Vec<(RectPx, &Region)> = regions
        .iter()
        .map(|r| (r.resolve_px(dims).clipped_to(dims), r))
        .filter(|(rect, _)| !rect.is_empty())
        .collect();

    let mut out = base.pixels.as_ref().clone();
    let row_bytes = dims.width as usize * 4;
    let tex = texture.pixels.as_ref();
    let (tex_w, tex_h) = (texture.dims.width, texture.dims.height);

    let buf: &mut [u8] = &mut out;
    buf.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (rect, region) in &rects {
                if y < rect.y || y >= rect.bottom() {
                    continue;
                }
                let ly = (y - rect.y) % tile;
                let ty = ((u64::from(ly) * u64::from(tex_h)) / u64::from(tile)) as u32;
                let ty = ty.min(tex_h - 1);

                for x in rect.x..rect.right() {
                    let lx = (x - rect.x) % tile;
                    let tx = ((u64::from(lx) * u64::from(tex_w)) / u64::from(tile)) as u32;
                    let tx = tx.min(tex_w - 1);

                    let i = x as usize * 4;
                    let b = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                    let painted = blend_pixel(b, tex.get_pixel(tx, ty).0, region.blend, region.opacity);
                    row[i..i + 4].copy_from_slice(&painted);
                }
            }
        });

    Ok(out)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// CSS-style background layer for one painted region.
pub struct BackgroundLayer {
    /// Region name this layer paints.
    pub region: String,
    /// Paint source reference (texture payload or passthrough source).
    pub image: String,
    /// Region placement on the base, in pixels.
    pub rect_px: RectPx,
    /// One full texture repeat, in pixels (CSS `background-size`).
    pub size_px: u32,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f32,
    /// CSS `mix-blend-mode` equivalent.
    pub blend: BlendMode,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// DOM-style realization: the base image plus one background layer per
/// painted region. Valid for any provenance since nothing is flattened.
pub struct LayeredPreview {
    /// Base image reference.
    pub base_image: String,
    /// Base dimensions in pixels.
    pub base_size: PixelSize,
    /// Layers in paint order.
    pub layers: Vec<BackgroundLayer>,
}

/// Describe the composite as background layers instead of flattening it.
pub fn layered_preview(
    base_image: &str,
    base_size: PixelSize,
    texture_ref: &str,
    size_px: u32,
    regions: &[Region],
) -> LayeredPreview {
    let layers = regions
        .iter()
        .map(|r| BackgroundLayer {
            region: r.name.clone(),
            image: texture_ref.to_string(),
            rect_px: r.resolve_px(base_size).clipped_to(base_size),
            size_px,
            opacity: r.opacity,
            blend: r.blend,
        })
        .collect();

    LayeredPreview {
        base_image: base_image.to_string(),
        base_size,
        layers,
    }
}
