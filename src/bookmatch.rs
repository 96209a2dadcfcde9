//! Seamless texture synthesis by bookmatching.
//!
//! A bookmatch unit is the source with its mirror images: original top-left,
//! flip-X top-right, flip-Y bottom-left, 180-degree rotation bottom-right.
//! Because flips are exact pixel moves, every edge of the unit coincides with
//! the matching edge of its neighbor under translation tiling, so the pattern
//! is seamless by construction, with no resampling and no feathering.

use std::{collections::HashMap, sync::Arc};

use image::{Rgba, RgbaImage, imageops};

use crate::{
    assets::{PreparedImage, SourceId, decode, proxy::Provenance},
    foundation::core::PixelSize,
    foundation::error::{VeneerError, VeneerResult},
    recipe::{TileMethod, TileRecipe},
    tuning,
};

#[derive(Clone, Debug)]
/// Synthesized texture plus the lossy payload and the recipe that built it.
pub struct BookmatchedTexture {
    /// Identity of the source photo this texture came from.
    pub source_id: SourceId,
    /// Taint inherited from the source; gates flattened export.
    pub provenance: Provenance,
    /// The recipe that produced it.
    pub recipe: TileRecipe,
    /// Texture dimensions; never zero on either axis.
    pub dims: PixelSize,
    /// Straight RGBA8 texture, seamless under translation tiling.
    pub pixels: Arc<RgbaImage>,
    /// JPEG payload suitable for reuse as a paint source.
    pub jpeg: Arc<Vec<u8>>,
}

/// Mean color of the source, used to fill square-canvas margins.
pub fn average_color(pixels: &RgbaImage) -> Rgba<u8> {
    let n = u64::from(pixels.width()) * u64::from(pixels.height());
    if n == 0 {
        return Rgba([0, 0, 0, 255]);
    }

    let mut sums = [0u64; 4];
    for px in pixels.pixels() {
        for (sum, &ch) in sums.iter_mut().zip(px.0.iter()) {
            *sum += u64::from(ch);
        }
    }

    let mut out = [0u8; 4];
    for (o, sum) in out.iter_mut().zip(sums.iter()) {
        *o = ((sum + n / 2) / n) as u8;
    }
    Rgba(out)
}

/// Center the source on a `max(w, h)` square filled with its average color.
///
/// The fill must be opaque: transparent margins would punch holes through
/// multiply-blended regions downstream.
pub fn pad_to_square_centered(pixels: &RgbaImage) -> RgbaImage {
    let (w, h) = pixels.dimensions();
    if w == h {
        return pixels.clone();
    }

    let side = w.max(h);
    let mut canvas = RgbaImage::from_pixel(side, side, average_color(pixels));
    let x = i64::from((side - w) / 2);
    let y = i64::from((side - h) / 2);
    imageops::replace(&mut canvas, pixels, x, y);
    canvas
}

/// Assemble the 2w x 2h bookmatch unit from the source.
pub fn mirror_unit(pixels: &RgbaImage) -> RgbaImage {
    let (w, h) = pixels.dimensions();
    let mut unit = RgbaImage::new(w * 2, h * 2);
    imageops::replace(&mut unit, pixels, 0, 0);
    imageops::replace(&mut unit, &imageops::flip_horizontal(pixels), i64::from(w), 0);
    imageops::replace(&mut unit, &imageops::flip_vertical(pixels), 0, i64::from(h));
    imageops::replace(
        &mut unit,
        &imageops::rotate180(pixels),
        i64::from(w),
        i64::from(h),
    );
    unit
}

/// Shrink source dimensions so the final grid edge stays within the texture
/// cap. Scaling happens before mirroring, which keeps the mirror symmetry
/// exact at any ratio.
fn fit_source_dims(dims: PixelSize, repetition: u32) -> VeneerResult<PixelSize> {
    let cap = u64::from(tuning::MAX_TEXTURE_EDGE_PX);
    let cells = u64::from(repetition) * 2;
    if cells > cap {
        return Err(VeneerError::surface(format!(
            "a {repetition}x{repetition} unit grid cannot fit within {}px",
            tuning::MAX_TEXTURE_EDGE_PX
        )));
    }

    let max_edge = cells * u64::from(dims.max_dim());
    if max_edge <= cap {
        return Ok(dims);
    }

    let scale = |d: u32| (u64::from(d) * cap / max_edge).max(1) as u32;
    PixelSize::new(scale(dims.width), scale(dims.height))
}

/// Synthesize the seamless texture for one prepared source.
///
/// The source is never mutated. The returned texture owns its pixels and a
/// JPEG payload encoded at [`tuning::JPEG_QUALITY`].
#[tracing::instrument(skip(prepared))]
pub fn build_texture(
    prepared: &PreparedImage,
    id: SourceId,
    recipe: TileRecipe,
) -> VeneerResult<BookmatchedTexture> {
    if recipe.repetition == 0 {
        return Err(VeneerError::validation("recipe repetition must be >= 1"));
    }

    let squared;
    let source: &RgbaImage = if recipe.method.pads_to_square() && !prepared.dims.is_square() {
        squared = pad_to_square_centered(&prepared.pixels);
        &squared
    } else {
        prepared.pixels.as_ref()
    };

    let source_dims = PixelSize::new(source.width(), source.height())?;
    let fitted = fit_source_dims(source_dims, recipe.repetition)?;
    let scaled;
    let base: &RgbaImage = if fitted == source_dims {
        source
    } else {
        scaled = imageops::resize(
            source,
            fitted.width,
            fitted.height,
            imageops::FilterType::Triangle,
        );
        &scaled
    };

    let unit = mirror_unit(base);
    let pixels = if recipe.repetition == 1 {
        unit
    } else {
        let mut grid = RgbaImage::new(
            unit.width() * recipe.repetition,
            unit.height() * recipe.repetition,
        );
        imageops::tile(&mut grid, &unit);
        grid
    };

    let dims = PixelSize::new(pixels.width(), pixels.height())?;
    let jpeg = decode::encode_jpeg(&pixels, tuning::JPEG_QUALITY)?;
    Ok(BookmatchedTexture {
        source_id: id,
        provenance: prepared.provenance,
        recipe,
        dims,
        pixels: Arc::new(pixels),
        jpeg: Arc::new(jpeg),
    })
}

/// Texture that paints the unmodified source: the graceful fallback when the
/// grid cannot be synthesized. Still honors the texture cap.
pub fn passthrough_texture(
    prepared: &PreparedImage,
    id: SourceId,
) -> VeneerResult<BookmatchedTexture> {
    let cap = tuning::MAX_TEXTURE_EDGE_PX;
    let dims = prepared.dims;
    let pixels = if dims.max_dim() <= cap {
        prepared.pixels.as_ref().clone()
    } else {
        let scale =
            |d: u32| (u64::from(d) * u64::from(cap) / u64::from(dims.max_dim())).max(1) as u32;
        imageops::resize(
            prepared.pixels.as_ref(),
            scale(dims.width),
            scale(dims.height),
            imageops::FilterType::Triangle,
        )
    };

    let dims = PixelSize::new(pixels.width(), pixels.height())?;
    let jpeg = decode::encode_jpeg(&pixels, tuning::JPEG_QUALITY)?;
    Ok(BookmatchedTexture {
        source_id: id,
        provenance: prepared.provenance,
        recipe: TileRecipe {
            method: TileMethod::Standard,
            repetition: 1,
            background_size_px: tuning::BACKGROUND_TILE_PX,
        },
        dims,
        pixels: Arc::new(pixels),
        jpeg: Arc::new(jpeg),
    })
}

#[derive(Debug, Default)]
/// Memoizes built textures per source identity.
pub struct TextureCache {
    entries: HashMap<SourceId, BookmatchedTexture>,
    build_counts: HashMap<SourceId, u32>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the texture for `id`, building it at most once. Failed builds
    /// are not cached and not counted.
    pub fn get_or_build<F>(&mut self, id: SourceId, build: F) -> VeneerResult<BookmatchedTexture>
    where
        F: FnOnce() -> VeneerResult<BookmatchedTexture>,
    {
        if let Some(hit) = self.entries.get(&id) {
            return Ok(hit.clone());
        }

        let texture = build()?;
        *self.build_counts.entry(id).or_insert(0) += 1;
        self.entries.insert(id, texture.clone());
        Ok(texture)
    }

    /// Successful builds recorded for `id`.
    pub fn build_count(&self, id: SourceId) -> u32 {
        self.build_counts.get(&id).copied().unwrap_or(0)
    }

    /// Drop the texture for one identity, forcing a rebuild on next use.
    pub fn invalidate(&mut self, id: SourceId) {
        self.entries.remove(&id);
    }

    /// Drop every cached texture.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
