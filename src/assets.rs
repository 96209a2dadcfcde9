//! Image sources: identity, loading, and decode-once caching.
//!
//! Loading is front-loaded so classification and synthesis stay deterministic
//! and IO-free. Implementors of [`ImageLoader`] own all IO and decide the
//! [`Provenance`] of what they hand back; the crate core never fetches.

pub mod decode;
pub mod proxy;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use image::RgbaImage;

use crate::{
    assets::proxy::Provenance,
    foundation::core::PixelSize,
    foundation::error::{VeneerError, VeneerResult},
    foundation::math::Fnv1a64,
};

#[derive(Clone, Debug)]
/// Prepared raster image in straight (non-premultiplied) RGBA8 form.
pub struct PreparedImage {
    /// Validated dimensions; never zero on either axis.
    pub dims: PixelSize,
    /// Pixel bytes in row-major straight RGBA8.
    pub pixels: Arc<RgbaImage>,
    /// Where the bytes came from; gates flattened export.
    pub provenance: Provenance,
}

impl PreparedImage {
    /// Wrap decoded pixels, rejecting empty images.
    pub fn new(pixels: RgbaImage, provenance: Provenance) -> VeneerResult<Self> {
        let (width, height) = pixels.dimensions();
        let dims = PixelSize::new(width, height)?;
        Ok(Self {
            dims,
            pixels: Arc::new(pixels),
            provenance,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Stable hashed identifier for a source image reference.
pub struct SourceId(pub(crate) u64);

impl SourceId {
    /// Construct a [`SourceId`] from a raw 64-bit value.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Derive the stable identity of a normalized source reference.
///
/// Two references name "the same image" exactly when their ids are equal;
/// texture and decode caches key on this.
pub fn source_id(normalized_source: &str) -> SourceId {
    let mut hasher = Fnv1a64::new_default();
    hasher.write_u8(b'I');
    hasher.write_bytes(normalized_source.as_bytes());
    hasher.write_u8(0);
    SourceId(hasher.finish())
}

/// Normalize a source reference for identity hashing and path resolution.
///
/// Remote `http(s)` URLs and root-relative references (leading `/`, e.g. a
/// proxy route) pass through with surrounding whitespace trimmed. Everything
/// else is treated as a filesystem-relative path: `\` folds to `/`, empty
/// and `.` segments drop, parent traversals (`..`) are rejected.
pub fn normalize_source(source: &str) -> VeneerResult<String> {
    let s = source.trim();
    if s.is_empty() {
        return Err(VeneerError::validation("image source must be non-empty"));
    }
    if proxy::is_remote_url(s) || s.starts_with('/') {
        return Ok(s.to_string());
    }

    let s = s.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(VeneerError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(VeneerError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Resolves a source reference to decoded pixels.
pub trait ImageLoader {
    /// Load and decode `source`, reusing prior work where possible.
    fn load(&mut self, source: &str) -> VeneerResult<PreparedImage>;
}

#[derive(Debug)]
/// Filesystem-backed loader with a decode-once cache per source identity.
pub struct FsImageLoader {
    root: PathBuf,
    cache: HashMap<SourceId, PreparedImage>,
    decode_counts: HashMap<SourceId, u32>,
}

impl FsImageLoader {
    /// Loader resolving relative sources under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
            decode_counts: HashMap::new(),
        }
    }

    /// Return the root directory used when resolving relative sources.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// How many times `id` has been decoded. The cache keeps this at 1 per
    /// identity until invalidated.
    pub fn decode_count(&self, id: SourceId) -> u32 {
        self.decode_counts.get(&id).copied().unwrap_or(0)
    }

    /// Drop one cached decode, forcing a fresh read on the next load.
    pub fn invalidate(&mut self, id: SourceId) {
        self.cache.remove(&id);
    }

    fn read_bytes(&self, norm_path: &str) -> VeneerResult<Vec<u8>> {
        let path = self.root.join(Path::new(norm_path));
        std::fs::read(&path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))
            .map_err(|e| VeneerError::decode(format!("{e:#}")))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&mut self, source: &str) -> VeneerResult<PreparedImage> {
        let norm = normalize_source(source)?;
        if proxy::is_remote_url(&norm) || norm.starts_with('/') {
            return Err(VeneerError::validation(format!(
                "filesystem loader requires relative paths, got '{norm}'"
            )));
        }

        let id = source_id(&norm);
        if let Some(hit) = self.cache.get(&id) {
            return Ok(hit.clone());
        }

        let bytes = self.read_bytes(&norm)?;
        let pixels = decode::decode_image(&bytes)?;
        let prepared = PreparedImage::new(pixels, Provenance::Local)?;
        *self.decode_counts.entry(id).or_insert(0) += 1;
        self.cache.insert(id, prepared.clone());
        Ok(prepared)
    }
}

#[derive(Debug, Default)]
/// In-memory loader for uploads, pre-fetched remote bytes, and tests.
pub struct MemoryImageLoader {
    images: HashMap<SourceId, PreparedImage>,
}

impl MemoryImageLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded pixels under `source`, returning their identity.
    pub fn insert(
        &mut self,
        source: &str,
        pixels: RgbaImage,
        provenance: Provenance,
    ) -> VeneerResult<SourceId> {
        let norm = normalize_source(source)?;
        let id = source_id(&norm);
        self.images.insert(id, PreparedImage::new(pixels, provenance)?);
        Ok(id)
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&mut self, source: &str) -> VeneerResult<PreparedImage> {
        let norm = normalize_source(source)?;
        let id = source_id(&norm);
        self.images
            .get(&id)
            .cloned()
            .ok_or_else(|| VeneerError::decode(format!("no image registered for source '{norm}'")))
    }
}
