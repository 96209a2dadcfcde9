//! Every numeric tuning constant in one place.
//!
//! These are deliberately constants rather than a config surface: the
//! classification thresholds and repetition factors are presentation tuning,
//! not semantic contracts, and the rest of the crate must stay pure in them.
//! Adjust here, re-run the snapshot tests, done.

/// `min(w, h)` below this is a very small source (pad to square, largest grid).
pub const SIZE_VERY_SMALL_MAX_PX: u32 = 200;

/// `min(w, h)` below this (and >= very-small) is a small source.
pub const SIZE_SMALL_MAX_PX: u32 = 500;

/// `min(w, h)` below this (and >= small) is a medium source; at or above, large.
pub const SIZE_MEDIUM_MAX_PX: u32 = 800;

/// `max(w/h, h/w)` below this is a balanced aspect.
pub const ASPECT_BALANCED_MAX: f64 = 2.0;

/// `max(w/h, h/w)` below this (and >= balanced) is unbalanced; at or above, extreme.
pub const ASPECT_UNBALANCED_MAX: f64 = 3.0;

/// Grid repetition for enhanced tiling of small sources.
pub const REPETITION_SMALL: u32 = 6;

/// Grid repetition for enhanced tiling of medium sources.
pub const REPETITION_MEDIUM: u32 = 5;

/// Grid repetition for enhanced tiling of large-but-unbalanced sources.
pub const REPETITION_UNBALANCED: u32 = 4;

/// Grid repetition for super-enhanced tiling of very small sources.
pub const REPETITION_VERY_SMALL: u32 = 8;

/// Grid repetition for super-enhanced tiling of extreme aspect ratios.
pub const REPETITION_EXTREME: u32 = 10;

/// CSS-style background-size: on-screen pixels covered by one full texture repeat.
pub const BACKGROUND_TILE_PX: u32 = 200;

/// Hard cap on either edge of a synthesized texture. The builder downscales the
/// source before mirroring to stay under it; requests that still exceed it are
/// surface errors.
pub const MAX_TEXTURE_EDGE_PX: u32 = 2048;

/// JPEG quality for the encoded texture payload (1-100).
pub const JPEG_QUALITY: u8 = 97;
