//! # Veneer guide (v0.1.0)
//!
//! This module is a standalone, end-to-end walkthrough of Veneer’s architecture and public API.
//! It is intentionally detailed so future phases (and external integrations) can build on a shared
//! mental model of what “a preview” means in this codebase.
//!
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//! If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`VisualizerSession`](crate::VisualizerSession): the stateful pipeline (loader + caches + identity guard)
//! - [`PreviewRequest`](crate::PreviewRequest): one “show product X in room Y” request
//! - [`Classification`](crate::Classification): size and aspect classes of a product photo
//! - [`TileRecipe`](crate::TileRecipe): how to synthesize a texture for that classification
//! - [`BookmatchedTexture`](crate::BookmatchedTexture): the synthesized, seamlessly tileable texture
//! - [`Mockup`](crate::Mockup) / [`Region`](crate::Region): a room photo and its paintable surfaces
//! - [`PreviewOutput`](crate::PreviewOutput): either a flattened [`CompositeBitmap`](crate::CompositeBitmap)
//!   or a [`LayeredPreview`](crate::LayeredPreview) description
//! - [`ImageLoader`](crate::ImageLoader): the only place external IO is allowed
//!
//! The preview pipeline is explicitly staged:
//!
//! 1. Load the product photo: [`ImageLoader::load`](crate::ImageLoader::load)
//! 2. Classify it: [`classify`](crate::classify)
//! 3. Select a recipe: [`select_recipe`](crate::select_recipe)
//! 4. Synthesize the texture: [`build_texture`](crate::build_texture)
//! 5. Realize the preview: [`composite_bitmap`](crate::composite_bitmap) or
//!    [`layered_preview`](crate::layered_preview)
//!
//! [`VisualizerSession::preview`](crate::VisualizerSession::preview) is the convenience wrapper
//! for all five stages, with memoization and cache reuse layered on top.
//!
//! ---
//!
//! ## “No IO in the synthesis core” (and why)
//!
//! Veneer wants classification, synthesis, and compositing to be deterministic, testable, and
//! portable. To do that, pipeline code never reaches into the filesystem (or network). Instead:
//!
//! - IO and decoding happen through [`ImageLoader`](crate::ImageLoader)
//! - The pipeline consumes **prepared** sources: [`PreparedImage`](crate::PreparedImage)
//!   (straight RGBA8 plus a provenance tag)
//!
//! Two implementations ship:
//!
//! - [`FsImageLoader`](crate::FsImageLoader): loads from a root directory and memoizes decodes
//! - [`MemoryImageLoader`](crate::MemoryImageLoader): a pre-registered in-memory store, used by
//!   tests and embedders that already hold pixels
//!
//! This design makes it straightforward to add a loader backed by an object store or an HTTP
//! client without changing pipeline logic.
//!
//! ---
//!
//! ## Straight alpha (Veneer’s pixel contract)
//!
//! Veneer’s internal and output pixel convention is **straight (non-premultiplied) RGBA8**:
//!
//! - decoded images keep their channels as decoded
//! - blend math ([`blend_pixel`](crate::blend_pixel)) takes straight base and texture pixels
//! - compositing changes base **color only**; base alpha (coverage) is preserved
//! - JPEG baking ([`encode_jpeg`](crate::encode_jpeg)) flattens alpha away, since JPEG has none
//!
//! If you feed Veneer’s bitmaps into a compositor that expects premultiplied alpha, convert at the
//! boundary. Treat every `RgbaImage` crossing the API as straight unless stated otherwise.
//!
//! ---
//!
//! ## Running a preview
//!
//! The following example registers two in-memory images (a slab photo and a room photo is all a
//! preview needs), then flattens one preview. No external IO is involved.
//!
//! ```rust,no_run
//! use image::{Rgba, RgbaImage};
//! use veneer::{
//!     MemoryImageLoader, PreviewOutput, PreviewRequest, Provenance, VisualizerSession,
//! };
//!
//! # fn main() -> veneer::VeneerResult<()> {
//! let mut loader = MemoryImageLoader::new();
//! loader.insert(
//!     "slabs/verde.jpg",
//!     RgbaImage::from_pixel(1000, 1000, Rgba([96, 118, 104, 255])),
//!     Provenance::Local,
//! )?;
//! loader.insert(
//!     "mockups/bathroom.png",
//!     RgbaImage::from_pixel(1000, 800, Rgba([214, 214, 214, 255])),
//!     Provenance::Local,
//! )?;
//!
//! let mut session = VisualizerSession::new(loader);
//! let (output, report) = session.preview(&PreviewRequest {
//!     source: "slabs/verde.jpg".to_string(),
//!     product_name: "Verde Alpi".to_string(),
//!     mockup_id: "bathroom".to_string(),
//!     regions: vec![],
//!     flatten: true,
//! })?;
//!
//! match output {
//!     PreviewOutput::Bitmap(bitmap) => {
//!         assert_eq!(bitmap.dims.width, 1000);
//!         assert_eq!(bitmap.dims.height, 800);
//!     }
//!     PreviewOutput::Layered(_) => unreachable!("local sources flatten"),
//! }
//! assert!(report.fallbacks.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Notes:
//!
//! - [`VisualizerSession::new`](crate::VisualizerSession::new) installs the builtin mockups
//!   ([`builtin_mockups`](crate::builtin_mockups)); [`VisualizerSession::with_mockups`](crate::VisualizerSession::with_mockups)
//!   validates and installs a custom set.
//! - The [`PreviewReport`](crate::PreviewReport) says what the pipeline actually did: the
//!   classification, the recipe, and any degraded paths taken.
//!
//! ---
//!
//! ## Source references and validation
//!
//! Sources are strings, normalized by [`normalize_source`](crate::normalize_source):
//!
//! - `http(s)` URLs pass through verbatim
//! - root-relative references (leading `/`, e.g. a proxy route) pass through verbatim
//! - everything else is a filesystem-relative path: `\` is folded to `/`, empty and `.` segments
//!   are dropped, and `..` components are rejected
//!
//! [`FsImageLoader`](crate::FsImageLoader) additionally refuses URLs and root-relative references,
//! since it can only resolve paths under its root directory.
//!
//! Validation checks that the reference is well-formed, but does not require that it resolves. IO
//! errors surface when the source is actually loaded.
//!
//! ---
//!
//! ## Classification: from photo to recipe
//!
//! [`Classification::of`](crate::Classification::of) is pure and total over non-zero dimensions:
//!
//! - the **size class** thresholds the smaller dimension (strictly below 200 / 500 / 800 px maps
//!   to very small / small / medium, at-or-above 800 is large)
//! - the **aspect class** thresholds the max/min side ratio (at-or-above 2 is unbalanced,
//!   at-or-above 3 is extreme)
//!
//! [`select_recipe`](crate::select_recipe) maps a classification to a [`TileRecipe`](crate::TileRecipe):
//! large balanced photos pass through standard tiling with one repetition; smaller or unbalanced
//! photos get denser bookmatch grids; very small or extreme photos are padded to a square first
//! ([`TileMethod::SuperEnhanced`](crate::TileMethod)). The mapping is a total function, so every
//! loadable photo has a recipe.
//!
//! ---
//!
//! ## Bookmatching: the seam-free unit
//!
//! [`build_texture`](crate::build_texture) assembles a 2x2 mirrored unit from the (possibly
//! padded and downscaled) source:
//!
//! - top-left: the source
//! - top-right: flipped horizontally
//! - bottom-left: flipped vertically
//! - bottom-right: rotated 180 degrees
//!
//! The unit is symmetric about both centerlines, so its first and last columns are equal, as are
//! its first and last rows. Translation-tiling such a unit is seamless by construction; no blend
//! margin or feathering is involved. The unit is then replicated into a repetition x repetition
//! grid, which preserves the edge property.
//!
//! To bound memory, the source is uniformly downscaled **before** mirroring so the finished grid
//! fits within [`tuning::MAX_TEXTURE_EDGE_PX`](crate::tuning::MAX_TEXTURE_EDGE_PX) on its longer
//! edge. Downscaling first preserves exact mirror symmetry; downscaling the finished grid would
//! smear the seams. If even one-pixel cells cannot fit, synthesis reports a surface error and the
//! session paints the unmodified source instead (recorded as a fallback in the report).
//!
//! Every texture also carries a baked JPEG payload (quality
//! [`tuning::JPEG_QUALITY`](crate::tuning::JPEG_QUALITY)) for embedders that hand the texture to
//! an `img`-like consumer.
//!
//! ---
//!
//! ## Mockups, regions, and the fixed tile size
//!
//! A [`Mockup`](crate::Mockup) is a room photo plus named [`Region`](crate::Region)s in
//! normalized `[0, 1]` coordinates. Regions resolve to pixel rectangles against the actual base
//! dimensions; adjacent regions that share an edge in normalized space share it in pixels too.
//!
//! Texture paint is anchored at each region’s origin and sized by
//! [`tuning::BACKGROUND_TILE_PX`](crate::tuning::BACKGROUND_TILE_PX): one whole texture repeat
//! per fixed-size block, regardless of the texture’s pixel dimensions. A high-resolution photo
//! and a thumbnail of the same slab therefore paint at the same visual scale.
//!
//! Per-region appearance is a blend mode ([`BlendMode`](crate::BlendMode): normal, multiply,
//! overlay, screen) and an opacity. Both realizations use the same integer blend math, so a
//! flattened bitmap and a layered description of the same request look alike.
//!
//! ---
//!
//! ## Flattened vs layered, and the taint rule
//!
//! [`PreviewOutput`](crate::PreviewOutput) has two realizations:
//!
//! - **Bitmap**: [`composite_bitmap`](crate::composite_bitmap) paints regions into a copy of the
//!   base photo. This reads pixels, so it is gated by provenance: a cross-origin base or texture
//!   makes flattening a tainted export, and the session falls back to the layered realization
//!   (recorded as [`FallbackReason::LayeredExport`](crate::FallbackReason)).
//! - **Layered**: [`layered_preview`](crate::layered_preview) is pure description (base reference
//!   plus one [`BackgroundLayer`](crate::BackgroundLayer) per region), serializable to JSON and
//!   directly expressible as CSS `background-*` properties.
//!
//! To keep cross-origin sources flattenable, configure a same-origin proxy route
//! ([`VisualizerSession::set_proxy`](crate::VisualizerSession::set_proxy)); the session then
//! routes such sources through it before loading, and the proxied pixels are clean.
//!
//! ---
//!
//! ## The identity guard
//!
//! Product visualizers re-submit the same request on every UI tick. The session therefore:
//!
//! - memoizes the last (request fingerprint, output, report); repeating the previous request
//!   verbatim re-runs nothing
//! - caches textures by source identity in a [`TextureCache`](crate::TextureCache); changing the
//!   mockup or opacity does not re-synthesize the texture
//! - hands out [`RequestToken`](crate::RequestToken)s; any input change bumps a generation, and
//!   [`VisualizerSession::is_current`](crate::VisualizerSession::is_current) lets pipelined
//!   callers discard results that arrived late instead of painting them
//!
//! [`VisualizerSession::invalidate_source`](crate::VisualizerSession::invalidate_source) drops
//! cached work for one source (e.g. the photo was replaced under the same name) and stales
//! outstanding tokens.
//!
//! ---
//!
//! ## CLI
//!
//! The `veneer` binary wraps the library for scripting and inspection:
//!
//! - `veneer classify <image>`: print the classification and selected recipe as JSON
//! - `veneer tile <image> -o out.png`: synthesize and write the bookmatched texture
//! - `veneer preview <image> --mockup <id> -o out.png`: flatten a preview
//! - `veneer preview <image> --mockup <id> --layered`: print the layered description as JSON
//! - `veneer mockups`: list builtin mockups and their regions
//!
//! All subcommands load through [`FsImageLoader`](crate::FsImageLoader) rooted at the current
//! directory (override with `--root`).
