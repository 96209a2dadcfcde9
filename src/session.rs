//! The visualizer session: an identity-guarded pipeline from product photo
//! to mockup preview.
//!
//! The session owns every piece of mutable state: the image loader, the
//! texture cache, and the memoized last output. The pipeline is a strict
//! sequence: load source, classify, bookmatch, load mockup, composite. An
//! identity guard at the top of [`VisualizerSession::preview`] answers
//! repeat requests from the memo, and a generation counter lets pipelined
//! callers discard stale results instead of painting them.

use std::sync::Arc;

use crate::{
    assets::{
        ImageLoader, PreparedImage, SourceId, normalize_source,
        proxy::{Provenance, ProxyRoute, classify_origin},
        source_id,
    },
    bookmatch::{BookmatchedTexture, TextureCache, build_texture, passthrough_texture},
    classify::{Classification, classify},
    compose::{CompositeBitmap, LayeredPreview, composite_bitmap, layered_preview},
    foundation::error::{VeneerError, VeneerResult},
    foundation::math::Fnv1a64,
    mockup::{Mockup, Region, builtin_mockups},
    recipe::{TileRecipe, select_recipe},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One preview request. Repeating the previous request verbatim is answered
/// from the memo without re-running the pipeline.
pub struct PreviewRequest {
    /// Product photo reference.
    pub source: String,
    /// Display label, carried through to the report.
    pub product_name: String,
    /// Mockup to paint into; must name a known mockup.
    pub mockup_id: String,
    /// Names of regions to paint; empty paints every region.
    pub regions: Vec<String>,
    /// Flatten to a bitmap (download) instead of describing layers (screen).
    pub flatten: bool,
}

#[derive(Clone, Debug)]
/// A realized preview.
pub enum PreviewOutput {
    /// Flattened bitmap; dimensions equal the mockup base.
    Bitmap(CompositeBitmap),
    /// CSS-style layered description.
    Layered(LayeredPreview),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A degraded path the pipeline took instead of failing.
pub enum FallbackReason {
    /// The synthesis surface was unavailable; the unmodified source was
    /// painted instead of a bookmatch grid.
    PassthroughTexture,
    /// Flattening was tainted by a cross-origin source; the layered
    /// realization was returned instead.
    LayeredExport,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// What the pipeline did for one request.
pub struct PreviewReport {
    /// Display label from the request.
    pub product_name: String,
    /// Classification of the loaded source.
    pub classification: Classification,
    /// Recipe selected for it.
    pub recipe: TileRecipe,
    /// Degraded paths taken, in order. Empty means the happy path.
    pub fallbacks: Vec<FallbackReason>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Generation snapshot handed to pipelined callers.
pub struct RequestToken(u64);

struct Memo {
    fingerprint: u64,
    output: PreviewOutput,
    report: PreviewReport,
}

/// Stateful preview pipeline over one image loader.
pub struct VisualizerSession<L> {
    loader: L,
    textures: TextureCache,
    mockups: Vec<Mockup>,
    proxy: Option<ProxyRoute>,
    app_origin: Option<String>,
    generation: u64,
    memo: Option<Memo>,
}

impl<L: ImageLoader> VisualizerSession<L> {
    /// Session over `loader` with the builtin mockup set.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            textures: TextureCache::new(),
            mockups: builtin_mockups(),
            proxy: None,
            app_origin: None,
            generation: 0,
            memo: None,
        }
    }

    /// Session over `loader` with a custom, validated mockup set.
    pub fn with_mockups(loader: L, mockups: Vec<Mockup>) -> VeneerResult<Self> {
        for mockup in &mockups {
            mockup.validate()?;
        }
        let mut session = Self::new(loader);
        session.mockups = mockups;
        Ok(session)
    }

    /// Route cross-origin sources through a same-origin proxy from now on.
    pub fn set_proxy(&mut self, proxy: ProxyRoute) {
        self.proxy = Some(proxy);
    }

    /// Origin that remote sources are classified against.
    pub fn set_app_origin(&mut self, origin: impl Into<String>) {
        self.app_origin = Some(origin.into());
    }

    /// The known mockups.
    pub fn mockups(&self) -> &[Mockup] {
        &self.mockups
    }

    /// Mockup lookup by id.
    pub fn mockup(&self, id: &str) -> Option<&Mockup> {
        self.mockups.iter().find(|m| m.id == id)
    }

    /// Access the loader, e.g. to register in-memory sources.
    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    /// Snapshot of the current generation.
    pub fn token(&self) -> RequestToken {
        RequestToken(self.generation)
    }

    /// Whether a token is still current. Pipelined callers check this before
    /// painting a result that arrived late.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }

    /// Successful texture builds for `source`, as the pipeline would route it.
    pub fn texture_build_count(&self, source: &str) -> VeneerResult<u32> {
        let routed = self.effective_source(source);
        let id = source_id(&normalize_source(&routed)?);
        Ok(self.textures.build_count(id))
    }

    /// Drop cached work for one source (e.g. the photo was replaced under the
    /// same name). Bumps the generation so in-flight tokens go stale.
    pub fn invalidate_source(&mut self, source: &str) -> VeneerResult<()> {
        let routed = self.effective_source(source);
        let id = source_id(&normalize_source(&routed)?);
        self.textures.invalidate(id);
        self.memo = None;
        self.generation += 1;
        Ok(())
    }

    /// Run the pipeline for `request`.
    ///
    /// Identical consecutive requests return the memoized output; any input
    /// change bumps the generation first, so failures leave no stale tokens.
    #[tracing::instrument(skip(self, request))]
    pub fn preview(
        &mut self,
        request: &PreviewRequest,
    ) -> VeneerResult<(PreviewOutput, PreviewReport)> {
        let fingerprint = fingerprint_request(request);
        if let Some(memo) = &self.memo
            && memo.fingerprint == fingerprint
        {
            return Ok((memo.output.clone(), memo.report.clone()));
        }

        self.generation += 1;
        let (output, report) = self.render(request)?;
        self.memo = Some(Memo {
            fingerprint,
            output: output.clone(),
            report: report.clone(),
        });
        Ok((output, report))
    }

    fn render(&mut self, request: &PreviewRequest) -> VeneerResult<(PreviewOutput, PreviewReport)> {
        let mockup = self
            .mockups
            .iter()
            .find(|m| m.id == request.mockup_id)
            .cloned()
            .ok_or_else(|| {
                VeneerError::validation(format!("unknown mockup '{}'", request.mockup_id))
            })?;
        let regions = select_regions(&mockup, &request.regions)?;

        let mut fallbacks = Vec::new();

        let routed = self.effective_source(&request.source);
        let prepared = self.loader.load(&routed)?;
        let texture_id = source_id(&normalize_source(&routed)?);

        let classification = classify(prepared.dims.width, prepared.dims.height)?;
        let recipe = select_recipe(classification);
        let texture = build_or_passthrough(
            &mut self.textures,
            &prepared,
            texture_id,
            recipe,
            &mut fallbacks,
        )?;

        let base = self.loader.load(&mockup.image_source)?;

        let texture_ref = format!("texture:{:016x}", texture_id.as_u64());
        let output = if request.flatten {
            match composite_bitmap(&base, &texture, &regions) {
                Ok(pixels) => PreviewOutput::Bitmap(CompositeBitmap {
                    dims: base.dims,
                    pixels: Arc::new(pixels),
                }),
                Err(VeneerError::TaintedExport(_)) => {
                    fallbacks.push(FallbackReason::LayeredExport);
                    PreviewOutput::Layered(layered_preview(
                        &mockup.image_source,
                        base.dims,
                        &texture_ref,
                        texture.recipe.background_size_px,
                        &regions,
                    ))
                }
                Err(e) => return Err(e),
            }
        } else {
            PreviewOutput::Layered(layered_preview(
                &mockup.image_source,
                base.dims,
                &texture_ref,
                texture.recipe.background_size_px,
                &regions,
            ))
        };

        let report = PreviewReport {
            product_name: request.product_name.clone(),
            classification,
            recipe,
            fallbacks,
        };
        Ok((output, report))
    }

    fn effective_source(&self, source: &str) -> String {
        if let Some(proxy) = &self.proxy
            && classify_origin(source, self.app_origin.as_deref()) == Provenance::CrossOrigin
        {
            return proxy.route(source);
        }
        source.to_string()
    }
}

fn fingerprint_request(request: &PreviewRequest) -> u64 {
    let mut hasher = Fnv1a64::new_default();
    for part in [
        request.source.as_str(),
        request.product_name.as_str(),
        request.mockup_id.as_str(),
    ] {
        hasher.write_bytes(part.as_bytes());
        hasher.write_u8(0);
    }
    for name in &request.regions {
        hasher.write_bytes(name.as_bytes());
        hasher.write_u8(0);
    }
    hasher.write_u8(u8::from(request.flatten));
    hasher.finish()
}

fn select_regions(mockup: &Mockup, names: &[String]) -> VeneerResult<Vec<Region>> {
    if names.is_empty() {
        return Ok(mockup.regions.clone());
    }
    names
        .iter()
        .map(|name| {
            mockup.region(name).cloned().ok_or_else(|| {
                VeneerError::validation(format!(
                    "mockup '{}' has no region '{}'",
                    mockup.id, name
                ))
            })
        })
        .collect()
}

/// Build the texture through the cache; on a surface error fall back to the
/// unmodified source. The downgrade is reported even when the passthrough
/// was already cached, which is visible as a recipe mismatch.
fn build_or_passthrough(
    cache: &mut TextureCache,
    prepared: &PreparedImage,
    id: SourceId,
    recipe: TileRecipe,
    fallbacks: &mut Vec<FallbackReason>,
) -> VeneerResult<BookmatchedTexture> {
    match cache.get_or_build(id, || build_texture(prepared, id, recipe)) {
        Ok(texture) => {
            if texture.recipe != recipe {
                fallbacks.push(FallbackReason::PassthroughTexture);
            }
            Ok(texture)
        }
        Err(VeneerError::Surface(_)) => {
            fallbacks.push(FallbackReason::PassthroughTexture);
            cache.get_or_build(id, || passthrough_texture(prepared, id))
        }
        Err(e) => Err(e),
    }
}
