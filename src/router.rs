//=========================================================================
// View Router
//
// Public entry point for navigation requests.
//
// Architecture:
// ```text
//     ViewRouterBuilder ──build()──> ViewRouter
//         │                            ├─ ViewRegistry  (live instances)
//         ├─ with_config()             ├─ RequestQueue  (hook-issued requests)
//         ├─ register::<T>()           ├─ SceneLoadTracker (pending loads)
//         └─ register_view()           └─ Host          (engine capabilities)
// ```
//
// Flow:
//   request_*() → show()/hide() → ViewRegistry::get_or_create() → hooks
//              → drain_requests() until the hook queue is empty
//   poll_scene_loads() → pending view / starting view → show()
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};
use serde_json::Value;

//=== Internal Dependencies ===============================================

use crate::core::config::{scene_name_from_identifier, ScaffoldConfig, StartingViewEntry};
use crate::core::error::{Result, ScaffoldError};
use crate::core::host::{ContainerHandle, Host};
use crate::core::path::PathResolver;
use crate::core::request::{RequestQueue, ViewRequest};
use crate::core::scene::{LoadMode, SceneLoadId, SceneLoadOutcome, SceneLoadRequest, SceneLoadTracker};
use crate::core::view::{
    Direction, LifecycleState, NamedView, View, ViewIdentity, ViewRegistry,
};

//=== ViewRouterBuilder ===================================================

/// Builder for configuring and constructing a [`ViewRouter`].
///
/// # Default Values
///
/// - **Config**: [`ScaffoldConfig::default`]
/// - **Factories**: none (unregistered names get a passive view)
///
/// # Examples
///
/// ```no_run
/// # use aetheric_scaffold::prelude::*;
/// #[derive(Default)]
/// struct MainMenu;
/// impl View for MainMenu {}
/// impl NamedView for MainMenu {
///     const NAME: &'static str = "MainMenu";
/// }
///
/// fn boot<H: Host>(host: H) -> Result<ViewRouter<H>> {
///     let config = ScaffoldConfig::load_or_create("scaffold.json")?;
///     let mut router = ViewRouterBuilder::new(host)
///         .with_config(config)
///         .register::<MainMenu>()
///         .build();
///
///     router.start()?;
///     Ok(router)
/// }
/// ```
pub struct ViewRouterBuilder<H: Host> {
    host: H,
    config: ScaffoldConfig,
    registry: ViewRegistry,
}

impl<H: Host> ViewRouterBuilder<H> {
    /// Creates a builder around the host engine bindings.
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: ScaffoldConfig::default(),
            registry: ViewRegistry::new(),
        }
    }

    /// Sets the configuration used for paths and starting views.
    pub fn with_config(mut self, config: ScaffoldConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a behaviour factory for views and overlays named `name`.
    pub fn register_view<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn View> + Send + 'static,
    {
        self.registry.register_factory(name, factory);
        self
    }

    /// Registers `T` under its [`NamedView::NAME`].
    pub fn register<T: NamedView>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Builds the router.
    pub fn build(self) -> ViewRouter<H> {
        info!(
            "Building view router (views: `{}`, starting views: {})",
            self.config.views_path,
            self.config.starting_views().len()
        );

        ViewRouter {
            host: self.host,
            config: self.config,
            registry: self.registry,
            requests: RequestQueue::new(),
            scene_loads: SceneLoadTracker::new(),
        }
    }
}

//=== ViewRouter ==========================================================

/// Routes show/hide and scene-load requests to view instances.
///
/// All requests return once their synchronous part is done. Hooks may
/// issue further requests; those run after the hooks return, in FIFO
/// order, and their failures are logged rather than returned.
///
/// # Mid-transition requests
///
/// A show or hide that arrives while the same view is transitioning is
/// queued and applied once the transition completes. Only the latest
/// queued request is kept.
pub struct ViewRouter<H: Host> {
    host: H,
    config: ScaffoldConfig,
    registry: ViewRegistry,
    requests: RequestQueue,
    scene_loads: SceneLoadTracker,
}

impl<H: Host> ViewRouter<H> {
    /// Upper bound on hook-issued request batches drained per call.
    /// Guards against hooks that keep requesting each other forever.
    const MAX_DRAIN_ROUNDS: usize = 64;

    //--- Construction -----------------------------------------------------

    /// Shorthand for [`ViewRouterBuilder::new`].
    pub fn builder(host: H) -> ViewRouterBuilder<H> {
        ViewRouterBuilder::new(host)
    }

    /// Shows the starting view configured for the host's active scene.
    ///
    /// Returns the view shown, or `None` when the scene has no starting
    /// view configured.
    pub fn start(&mut self) -> Result<Option<ViewIdentity>> {
        let current = self.host.current_scene();
        let scene = scene_name_from_identifier(&current).to_string();
        info!("Starting view router in scene `{}`", scene);

        match self.starting_view(&scene).identity() {
            Some(identity) => {
                self.show(identity.clone(), None)?;
                Ok(Some(identity))
            }
            None => {
                debug!("No starting view configured for `{}`", scene);
                Ok(None)
            }
        }
    }

    //--- View Requests ----------------------------------------------------

    /// Shows the view named `name`.
    pub fn request_view(&mut self, name: impl Into<String>) -> Result<()> {
        self.show(ViewIdentity::view(name), None)
    }

    /// Shows the view named `name`, handing `data` to its `on_show_start`.
    pub fn request_view_with(&mut self, name: impl Into<String>, data: Value) -> Result<()> {
        self.show(ViewIdentity::view(name), Some(data))
    }

    /// Hides the view named `name`.
    pub fn request_view_close(&mut self, name: impl Into<String>) {
        self.hide(ViewIdentity::view(name))
    }

    /// Shows the overlay named `name`.
    pub fn request_overlay(&mut self, name: impl Into<String>) -> Result<()> {
        self.show(ViewIdentity::overlay(name), None)
    }

    /// Shows the overlay named `name`, handing `data` to its `on_show_start`.
    pub fn request_overlay_with(&mut self, name: impl Into<String>, data: Value) -> Result<()> {
        self.show(ViewIdentity::overlay(name), Some(data))
    }

    /// Hides the overlay named `name`.
    pub fn request_overlay_close(&mut self, name: impl Into<String>) {
        self.hide(ViewIdentity::overlay(name))
    }

    /// Shows the view registered as `T`.
    pub fn request_view_of<T: NamedView>(&mut self) -> Result<()> {
        self.request_view(T::NAME)
    }

    /// Shows the overlay registered as `T`.
    pub fn request_overlay_of<T: NamedView>(&mut self) -> Result<()> {
        self.request_overlay(T::NAME)
    }

    /// Hides the view registered as `T`.
    pub fn request_view_close_of<T: NamedView>(&mut self) {
        self.request_view_close(T::NAME)
    }

    /// Hides the overlay registered as `T`.
    pub fn request_overlay_close_of<T: NamedView>(&mut self) {
        self.request_overlay_close(T::NAME)
    }

    /// Shows `identity`, creating it on first use. `data` is handed to
    /// `on_show_start`, also when the show is queued behind a hide.
    ///
    /// Fails with `TemplateNotFound` or `InvalidPath` if the instance
    /// cannot be created. Other live views are unaffected.
    pub fn show(&mut self, identity: ViewIdentity, data: Option<Value>) -> Result<()> {
        let result = self.show_internal(&identity, data);
        self.drain_requests();
        result
    }

    /// Hides `identity`. Unknown or already hidden views are ignored.
    pub fn hide(&mut self, identity: ViewIdentity) {
        self.hide_internal(&identity);
        self.drain_requests();
    }

    /// Reports that the deferred transition of `identity` has finished.
    ///
    /// Returns `false` when the view is unknown or not transitioning.
    pub fn complete_transition(&mut self, identity: &ViewIdentity) -> bool {
        let finished = match self.registry.try_get_mut(identity) {
            Some(instance) => instance.finish(&mut self.requests),
            None => false,
        };

        if !finished {
            warn!("No transition in flight for {}", identity);
        }

        self.drain_requests();
        finished
    }

    /// Stops tracking `identity` and destroys its host object.
    pub fn remove_view(&mut self, identity: &ViewIdentity) -> bool {
        self.registry.remove(identity, &mut self.host).is_some()
    }

    //--- Scene Requests ---------------------------------------------------

    /// Loads `scene` with no view attached.
    pub fn request_scene(&mut self, mode: LoadMode, scene: &str) -> SceneLoadId {
        self.begin_scene_load(mode, scene, None)
    }

    /// Loads `scene` and shows `identity` once the host reports success.
    pub fn request_scene_with_view(
        &mut self,
        identity: ViewIdentity,
        mode: LoadMode,
        scene: &str,
    ) -> SceneLoadId {
        self.begin_scene_load(mode, scene, Some(identity))
    }

    /// Processes scene loads that finished since the last poll.
    ///
    /// On success the pending view is shown, or the scene's starting view
    /// when no view was attached. On failure the pending view is dropped
    /// and the outcome carries `SceneLoadFailed`. Call once per frame.
    pub fn poll_scene_loads(&mut self) -> Vec<SceneLoadOutcome> {
        let finished = self.scene_loads.drain();
        let mut outcomes = Vec::with_capacity(finished.len());

        for (request, result) in finished {
            let result = match result {
                Ok(()) => {
                    info!("Scene `{}` loaded ({})", request.scene_name, request.id);
                    self.show_loaded(&request)
                }
                Err(reason) => {
                    warn!("Scene `{}` failed to load: {}", request.scene_name, reason);
                    if let Some(view) = &request.pending_view {
                        debug!("Discarding pending {}", view);
                    }
                    Err(ScaffoldError::SceneLoadFailed {
                        scene: request.scene_name.clone(),
                        reason,
                    })
                }
            };

            outcomes.push(SceneLoadOutcome { request, result });
        }

        outcomes
    }

    //--- Queries ----------------------------------------------------------

    /// Starting view for `scene`, or the default entry if none is set.
    pub fn starting_view(&self, scene: &str) -> StartingViewEntry {
        let current = self.host.current_scene();
        self.config.starting_view_resolver(&current).resolve(scene)
    }

    /// Sets the starting view for `entry.scene_name`, replacing any entry
    /// for the same scene. Returns `true` if the entry is new.
    pub fn upsert_starting_view(&mut self, entry: StartingViewEntry) -> bool {
        self.config.upsert_starting_view(entry)
    }

    /// Resolves the configured model container, creating it if missing.
    pub fn model_container(&mut self) -> Result<ContainerHandle> {
        let path = self.config.model_path()?;
        Ok(PathResolver::resolve(&mut self.host, &path))
    }

    /// Lifecycle state of a live view.
    pub fn lifecycle_state(&self, identity: &ViewIdentity) -> Option<LifecycleState> {
        self.registry.try_get(identity).map(|instance| instance.state())
    }

    /// Scene loads still waiting for their completion signal.
    pub fn pending_scene_loads(&self) -> impl Iterator<Item = &SceneLoadRequest> {
        self.scene_loads.pending()
    }

    /// Returns the registry of live views.
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Returns the host engine bindings.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to deliver scene-load completions.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    //--- Internal Helpers -------------------------------------------------

    fn execute(&mut self, request: ViewRequest) -> Result<()> {
        match request {
            ViewRequest::Show(identity, data) => self.show_internal(&identity, data),
            ViewRequest::Hide(identity) => {
                self.hide_internal(&identity);
                Ok(())
            }
            ViewRequest::LoadScene {
                mode,
                scene,
                pending_view,
            } => {
                self.begin_scene_load(mode, &scene, pending_view);
                Ok(())
            }
        }
    }

    fn show_internal(&mut self, identity: &ViewIdentity, data: Option<Value>) -> Result<()> {
        let created = !self.registry.contains(identity);
        let instance = self
            .registry
            .get_or_create(identity, &mut self.host, &self.config)?;

        if created {
            instance.fire(LifecycleState::Created, None, &mut self.requests);
        }

        instance.drive(Direction::Show, data, &mut self.requests);
        Ok(())
    }

    fn hide_internal(&mut self, identity: &ViewIdentity) {
        match self.registry.try_get_mut(identity) {
            Some(instance) => {
                instance.drive(Direction::Hide, None, &mut self.requests);
            }
            None => debug!("Ignoring hide for {}: not live", identity),
        }
    }

    fn begin_scene_load(
        &mut self,
        mode: LoadMode,
        scene: &str,
        pending_view: Option<ViewIdentity>,
    ) -> SceneLoadId {
        let completion = self.scene_loads.begin(scene, mode, pending_view);
        let id = completion.id();

        info!("Loading scene `{}` ({:?}, {})", scene, mode, id);
        self.host.load_scene(mode, scene, completion);
        id
    }

    fn show_loaded(&mut self, request: &SceneLoadRequest) -> Result<Option<ViewIdentity>> {
        let target = match &request.pending_view {
            Some(view) => Some(view.clone()),
            None => self.starting_view(&request.scene_name).identity(),
        };

        match target {
            Some(identity) => {
                self.show(identity.clone(), None)?;
                Ok(Some(identity))
            }
            None => Ok(None),
        }
    }

    /// Runs hook-issued requests until none remain.
    fn drain_requests(&mut self) {
        for _ in 0..Self::MAX_DRAIN_ROUNDS {
            let batch = self.requests.take();
            if batch.is_empty() {
                return;
            }

            for request in batch {
                if let Err(e) = self.execute(request) {
                    error!("Queued view request failed: {}", e);
                }
            }
        }

        if !self.requests.is_empty() {
            error!(
                "Dropping {} view requests after {} rounds; hooks keep re-requesting",
                self.requests.len(),
                Self::MAX_DRAIN_ROUNDS
            );
            self.requests.clear();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
