//! Veneer is a bookmatched texture synthesis and room-mockup compositing engine.
//!
//! Given one photo of a stone slab (or any tileable product surface), Veneer classifies it,
//! synthesizes a seamlessly tileable bookmatched texture from it, and paints that texture into
//! the tagged regions of a room photo. Everything is CPU-side and deterministic.
//!
//! The public API is session-oriented:
//!
//! - Register or point at images through an [`ImageLoader`]
//! - Create a [`VisualizerSession`]
//! - Submit [`PreviewRequest`]s and paint the returned [`PreviewOutput`]
//!
//! The [`guide`] module is the end-to-end architecture walkthrough.
#![forbid(unsafe_code)]

pub mod assets;
pub mod bookmatch;
pub mod classify;
pub mod compose;
pub mod foundation;
pub mod guide;
pub mod mockup;
pub mod recipe;
pub mod session;
pub mod tuning;

pub use crate::foundation::core::{PixelSize, RectPx};
pub use crate::foundation::error::{VeneerError, VeneerResult};

pub use crate::assets::decode::{decode_image, encode_jpeg};
pub use crate::assets::proxy::{Provenance, ProxyRoute, classify_origin};
pub use crate::assets::{
    FsImageLoader, ImageLoader, MemoryImageLoader, PreparedImage, SourceId, normalize_source,
    source_id,
};
pub use crate::bookmatch::{BookmatchedTexture, TextureCache, build_texture, passthrough_texture};
pub use crate::classify::{AspectClass, Classification, SizeClass, classify};
pub use crate::compose::{
    BackgroundLayer, CompositeBitmap, LayeredPreview, StraightRgba8, blend_pixel,
    composite_bitmap, layered_preview,
};
pub use crate::mockup::{BlendMode, Mockup, Region, builtin_mockups};
pub use crate::recipe::{TileMethod, TileRecipe, select_recipe};
pub use crate::session::{
    FallbackReason, PreviewOutput, PreviewReport, PreviewRequest, RequestToken, VisualizerSession,
};
