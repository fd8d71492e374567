use crate::{
    assets::{
        decode::DecodedImage,
        loader::{ImageLoader, LocalLoader, load_image},
        source::ImageSource,
    },
    encode::{
        png::{ExportedImage, encode_png, export_file_name},
        sink::ExportSink,
    },
    engine::{
        config::EngineOpts,
        overlay::{CatalogEntry, Overlay, TransformPatch},
        ticket::{Commit, Generations, LoadSlot, LoadTicket},
    },
    foundation::{
        core::HostRegion,
        error::{OverlayzError, OverlayzResult},
    },
    render::{
        pass::{OverlayLayer, composite_frame},
        surface::{Surface, fit_surface},
    },
};

/// Pending overlay decode started by [`CompositeEngine::begin_overlay_load`].
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayLoad {
    entry: CatalogEntry,
    ticket: LoadTicket,
}

impl OverlayLoad {
    /// Catalog entry being loaded.
    pub fn entry(&self) -> &CatalogEntry {
        &self.entry
    }

    /// Source the caller must decode before committing.
    pub fn source(&self) -> ImageSource {
        self.entry.source()
    }
}

/// What selecting a catalog entry turned into.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayRequest {
    /// The entry was already applied and has been toggled off.
    Removed,
    /// The entry must be decoded and committed.
    Load(OverlayLoad),
}

/// State that only exists between `initialize` calls.
#[derive(Debug)]
struct Session {
    region: HostRegion,
    surface: Surface,
    base: Option<DecodedImage>,
    overlays: Vec<Overlay>,
    selected: Option<String>,
    next_order: u64,
    generations: Generations,
}

impl Session {
    fn new(id: u64, region: HostRegion, opts: &EngineOpts) -> Self {
        Self {
            region,
            surface: Surface::new(opts.placeholder),
            base: None,
            overlays: Vec::new(),
            selected: None,
            next_order: 1,
            generations: Generations::new(id),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.overlays.iter().position(|o| o.id == id)
    }

    fn remove(&mut self, id: &str) -> Option<Overlay> {
        let idx = self.position(id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        // Outstanding loads for this id must not resurrect it.
        self.generations.bump(&LoadSlot::Overlay(id.to_string()));
        Some(self.overlays.remove(idx))
    }

    fn render(&mut self, opts: &EngineOpts) {
        let layers: Vec<OverlayLayer<'_>> = self
            .overlays
            .iter()
            .map(|o| OverlayLayer {
                image: &o.image,
                offset_x: o.offset_x,
                offset_y: o.offset_y,
                scale: o.scale,
                stacking_order: o.stacking_order,
            })
            .collect();
        composite_frame(
            &mut self.surface,
            opts.clear_color(),
            self.base.as_ref(),
            &layers,
            opts.filter,
        );
    }
}

/// Rendering state machine: one base image, an ordered set of transformable overlays, and the
/// surface they are composited into.
///
/// Every mutating operation re-renders synchronously before returning, so the surface always
/// reflects the current state. Decoding is the only suspending step; a decode either commits
/// completely or leaves the engine untouched.
///
/// Loads that may overlap (driven outside `&mut self`) go through the split API:
/// [`begin_base_load`](Self::begin_base_load) / [`commit_base`](Self::commit_base) and
/// [`begin_overlay_load`](Self::begin_overlay_load) / [`commit_overlay`](Self::commit_overlay).
/// Only the most recent request per slot can commit; older ones come back as [`Commit::Stale`].
/// The `async` convenience methods reserve their slot only after the decode succeeded, so a
/// failed convenience load never invalidates a split-API load still in flight.
pub struct CompositeEngine<L = LocalLoader> {
    loader: L,
    opts: EngineOpts,
    sessions: u64,
    session: Option<Session>,
}

impl CompositeEngine<LocalLoader> {
    /// Engine reading sources through a [`LocalLoader`] with default options.
    pub fn with_local_loader() -> Self {
        Self::new(LocalLoader::new(), EngineOpts::default())
    }
}

#[cfg(feature = "http")]
impl CompositeEngine<crate::assets::http::HttpLoader> {
    /// Engine fetching remote and `ipfs://` sources through an [`HttpLoader`] with default
    /// options.
    ///
    /// [`HttpLoader`]: crate::HttpLoader
    pub fn with_http_loader() -> Self {
        Self::new(crate::assets::http::HttpLoader::new(), EngineOpts::default())
    }
}

impl<L: ImageLoader> CompositeEngine<L> {
    /// Uninitialized engine; call [`initialize`](Self::initialize) before anything else.
    pub fn new(loader: L, opts: EngineOpts) -> Self {
        Self {
            loader,
            opts,
            sessions: 0,
            session: None,
        }
    }

    /// Options the engine was built with.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Loader used by the `async` operations.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Create a fresh placeholder surface for `region`, discarding all prior state.
    ///
    /// Outstanding load tickets from an earlier session can no longer commit.
    #[tracing::instrument(skip(self))]
    pub fn initialize(&mut self, region: HostRegion) -> OverlayzResult<&Surface> {
        if region.is_degenerate() {
            return Err(OverlayzError::initialization(format!(
                "hosting region {}x{} is not available",
                region.width, region.height
            )));
        }
        self.opts.validate()?;

        self.sessions += 1;
        let session = self
            .session
            .insert(Session::new(self.sessions, region, &self.opts));
        tracing::debug!(
            session = self.sessions,
            width = session.surface.width(),
            height = session.surface.height(),
            "surface initialized"
        );
        Ok(&session.surface)
    }

    /// Region the current session was initialized with.
    pub fn region(&self) -> Option<HostRegion> {
        self.session.as_ref().map(|s| s.region)
    }

    /// Last rendered surface.
    pub fn surface(&self) -> Option<&Surface> {
        self.session.as_ref().map(|s| &s.surface)
    }

    /// Current base image, if one was set.
    pub fn base_image(&self) -> Option<&DecodedImage> {
        self.session.as_ref().and_then(|s| s.base.as_ref())
    }

    /// Independent snapshot of the applied overlays in insertion order.
    pub fn overlays(&self) -> Vec<Overlay> {
        self.session
            .as_ref()
            .map(|s| s.overlays.clone())
            .unwrap_or_default()
    }

    /// Applied overlay with `id`.
    pub fn overlay(&self, id: &str) -> Option<&Overlay> {
        self.session
            .as_ref()
            .and_then(|s| s.overlays.iter().find(|o| o.id == id))
    }

    /// Number of applied overlays.
    pub fn overlay_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.overlays.len())
    }

    /// Decode `source` and make it the base image, resizing the surface to its aspect ratio.
    ///
    /// Applied overlays are kept; switching subjects is done with
    /// [`reset_subject`](Self::reset_subject) or an explicit
    /// [`clear_overlays`](Self::clear_overlays). The selection pointer is cleared on success.
    #[tracing::instrument(skip(self, source), fields(source = %source.describe()))]
    pub async fn set_base_image(&mut self, source: &ImageSource) -> OverlayzResult<()> {
        self.session_mut()?;
        let image = self.fetch(source).await?;
        let ticket = self.begin_base_load()?;
        let _ = self.commit_base(ticket, image)?;
        Ok(())
    }

    /// Clear overlays and selection, then set a new base image.
    ///
    /// The decode happens first: if it fails, nothing is cleared.
    #[tracing::instrument(skip(self, source), fields(source = %source.describe()))]
    pub async fn reset_subject(&mut self, source: &ImageSource) -> OverlayzResult<()> {
        self.session_mut()?;
        let image = self.fetch(source).await?;
        let ticket = self.begin_base_load()?;
        if let Some(session) = self.session.as_mut() {
            for id in session.overlays.iter().map(|o| o.id.clone()).collect::<Vec<_>>() {
                session.remove(&id);
            }
        }
        let _ = self.commit_base(ticket, image)?;
        Ok(())
    }

    /// Apply `entry`, or remove it if an overlay with the same id is already applied.
    ///
    /// Resolves with the new instance, or `None` when the call toggled an overlay off.
    #[tracing::instrument(skip(self, entry), fields(id = %entry.id))]
    pub async fn add_or_toggle_overlay(
        &mut self,
        entry: &CatalogEntry,
    ) -> OverlayzResult<Option<Overlay>> {
        self.session_mut()?;
        if self.remove_overlay(&entry.id) {
            tracing::debug!(id = %entry.id, "overlay toggled off");
            return Ok(None);
        }
        let image = self.fetch(&entry.source()).await?;
        match self.begin_overlay_load(entry)? {
            OverlayRequest::Removed => Ok(None),
            OverlayRequest::Load(load) => Ok(self.commit_overlay(load, image)?.applied()),
        }
    }

    /// Reserve the base slot for a new decode.
    pub fn begin_base_load(&mut self) -> OverlayzResult<LoadTicket> {
        let session = self.session_mut()?;
        Ok(session.generations.issue(LoadSlot::Base))
    }

    /// Install a decoded base image if `ticket` is still the latest base request.
    pub fn commit_base(
        &mut self,
        ticket: LoadTicket,
        image: DecodedImage,
    ) -> OverlayzResult<Commit<()>> {
        if ticket.slot != LoadSlot::Base {
            return Err(OverlayzError::validation(
                "commit_base called with an overlay ticket",
            ));
        }
        let opts = &self.opts;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| OverlayzError::initialization("engine not initialized"))?;
        if !session.generations.is_current(&ticket) {
            tracing::warn!(generation = ticket.generation, "stale base image load dropped");
            return Ok(Commit::Stale);
        }

        let size = fit_surface(image.width, image.height, session.region, opts.max_edge);
        session.surface.resize(size);
        session.base = Some(image);
        session.selected = None;
        session.render(opts);
        tracing::debug!(width = size.width, height = size.height, "base image set");
        Ok(Commit::Applied(()))
    }

    /// Toggle `entry` off if applied; otherwise reserve its slot for a decode.
    pub fn begin_overlay_load(&mut self, entry: &CatalogEntry) -> OverlayzResult<OverlayRequest> {
        let opts = &self.opts;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| OverlayzError::initialization("engine not initialized"))?;

        if session.remove(&entry.id).is_some() {
            session.render(opts);
            tracing::debug!(id = %entry.id, "overlay toggled off");
            return Ok(OverlayRequest::Removed);
        }

        let ticket = session
            .generations
            .issue(LoadSlot::Overlay(entry.id.clone()));
        Ok(OverlayRequest::Load(OverlayLoad {
            entry: entry.clone(),
            ticket,
        }))
    }

    /// Append a decoded overlay if `load` is still the latest request for its id.
    ///
    /// The new instance is centered, unscaled, on top of the stack and selected for editing.
    pub fn commit_overlay(
        &mut self,
        load: OverlayLoad,
        image: DecodedImage,
    ) -> OverlayzResult<Commit<Overlay>> {
        let opts = &self.opts;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| OverlayzError::initialization("engine not initialized"))?;
        if !session.generations.is_current(&load.ticket) || session.position(&load.entry.id).is_some()
        {
            tracing::warn!(id = %load.entry.id, "stale overlay load dropped");
            return Ok(Commit::Stale);
        }

        let overlay = Overlay::new(&load.entry, image, session.next_order);
        session.next_order += 1;
        session.overlays.push(overlay.clone());
        session.selected = Some(overlay.id.clone());
        session.render(opts);
        tracing::debug!(
            id = %overlay.id,
            stacking_order = overlay.stacking_order,
            "overlay applied"
        );
        Ok(Commit::Applied(overlay))
    }

    /// Remove the overlay with `id`; `false` if there was none (or no session).
    #[tracing::instrument(skip(self))]
    pub fn remove_overlay(&mut self, id: &str) -> bool {
        let opts = &self.opts;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.remove(id).is_none() {
            return false;
        }
        session.render(opts);
        true
    }

    /// Remove every applied overlay; the base image stays.
    #[tracing::instrument(skip(self))]
    pub fn clear_overlays(&mut self) {
        let opts = &self.opts;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let ids: Vec<String> = session.overlays.iter().map(|o| o.id.clone()).collect();
        for id in &ids {
            session.remove(id);
        }
        session.render(opts);
        tracing::debug!(removed = ids.len(), "overlays cleared");
    }

    /// Apply the present fields of `patch` to overlay `id`; returns whether it exists.
    #[tracing::instrument(skip(self))]
    pub fn update_overlay_transform(&mut self, id: &str, patch: TransformPatch) -> bool {
        let opts = &self.opts;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(overlay) = session.overlays.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        overlay.apply(patch);
        session.render(opts);
        true
    }

    /// Point the transform controls at overlay `id`; `false` if it is not applied.
    pub fn select_overlay(&mut self, id: &str) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.position(id).is_none() {
            return false;
        }
        session.selected = Some(id.to_string());
        true
    }

    /// Clear the selection pointer.
    pub fn deselect_overlay(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.selected = None;
        }
    }

    /// Id of the overlay the transform controls point at.
    pub fn selected_overlay(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.selected.as_deref())
    }

    /// Apply `patch` to whichever overlay is selected; `false` when nothing is selected.
    pub fn update_selected_transform(&mut self, patch: TransformPatch) -> bool {
        let Some(id) = self.selected_overlay().map(str::to_string) else {
            return false;
        };
        self.update_overlay_transform(&id, patch)
    }

    /// Encode the last rendered frame as PNG and hand it to `sink` as `<file_name_base>.png`.
    ///
    /// Nothing is re-rendered: the export is exactly the current surface.
    #[tracing::instrument(skip(self, sink))]
    pub async fn export_composite(
        &self,
        file_name_base: &str,
        sink: &mut dyn ExportSink,
    ) -> OverlayzResult<ExportedImage> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| OverlayzError::export("not initialized"))?;

        let png = encode_png(&session.surface)?;
        let exported = ExportedImage {
            file_name: export_file_name(file_name_base),
            width: session.surface.width(),
            height: session.surface.height(),
            png,
        };
        sink.save(&exported.file_name, &exported.png)?;
        tracing::debug!(
            file = %exported.file_name,
            bytes = exported.png.len(),
            "composite exported"
        );
        Ok(exported)
    }

    fn session_mut(&mut self) -> OverlayzResult<&mut Session> {
        self.session
            .as_mut()
            .ok_or_else(|| OverlayzError::initialization("engine not initialized"))
    }

    async fn fetch(&self, source: &ImageSource) -> OverlayzResult<DecodedImage> {
        load_image(&self.loader, source).await.inspect_err(|e| {
            tracing::warn!(source = %source.describe(), error = %e, "image load failed");
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/compositor.rs"]
mod tests;
