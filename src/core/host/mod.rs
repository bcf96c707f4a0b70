//=========================================================================
// Host Bridge
//=========================================================================
//
// Contract between the navigation core and the host engine.
//
// The core never touches engine objects directly. It consumes these
// capabilities so that engine backends can be swapped without changing
// core code:
//
// - `ContainerSystem`: scene-graph lookup, creation and tagging
// - `AssetLoader`: template lookup by view name
// - `SceneLoader`: asynchronous scene loading
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::error::Result;
use crate::core::scene::{LoadMode, SceneLoadCompletion};
use crate::core::view::ViewKind;

//=== Test Support ========================================================

#[cfg(test)]
pub(crate) mod testing;

//=== Handles =============================================================

/// Opaque reference to a host container (scene-graph node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerHandle(u64);

impl ContainerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque reference to a loaded view template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateHandle(u64);

impl TemplateHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

//=== ContainerSystem =====================================================

/// Scene-graph operations needed to place view instances.
pub trait ContainerSystem {
    /// Finds a root-level container by name.
    fn find_top_level(&self, name: &str) -> Option<ContainerHandle>;

    /// Finds a direct child of `parent` by name.
    fn find_child(&self, parent: ContainerHandle, name: &str) -> Option<ContainerHandle>;

    /// Creates an empty container, parented under `parent` when given.
    fn create_container(&mut self, name: &str, parent: Option<ContainerHandle>) -> ContainerHandle;

    /// Whether the container carries the scaffold marker.
    fn is_tagged(&self, container: ContainerHandle) -> bool;

    /// Attaches the scaffold marker.
    fn tag(&mut self, container: ContainerHandle);

    /// Instantiates a template under `parent` and names the new object.
    ///
    /// `active` decides whether the object starts enabled.
    fn instantiate(
        &mut self,
        template: TemplateHandle,
        name: &str,
        parent: ContainerHandle,
        active: bool,
    ) -> ContainerHandle;

    /// Destroys a container and everything below it.
    fn destroy(&mut self, container: ContainerHandle);
}

//=== AssetLoader =========================================================

/// Template lookup for views and overlays.
pub trait AssetLoader {
    /// Loads the template for `name` from `search_path`.
    ///
    /// Fails with [`crate::ScaffoldError::TemplateNotFound`] when no asset
    /// matches.
    fn load_template(&mut self, kind: ViewKind, name: &str, search_path: &str)
        -> Result<TemplateHandle>;
}

//=== SceneLoader =========================================================

/// Asynchronous scene loading.
pub trait SceneLoader {
    /// Starts loading `scene`.
    ///
    /// The loader must eventually consume `completion` by calling
    /// [`SceneLoadCompletion::succeed`] or [`SceneLoadCompletion::fail`].
    /// Dropping it unsignalled is reported as a failure.
    fn load_scene(&mut self, mode: LoadMode, scene: &str, completion: SceneLoadCompletion);

    /// Engine identifier of the active scene (may include directory and
    /// file extension).
    fn current_scene(&self) -> String;
}

//=== Host ================================================================

/// Everything the router needs from the engine.
///
/// Blanket-implemented for any type providing all three capabilities.
pub trait Host: ContainerSystem + AssetLoader + SceneLoader {}

impl<T: ContainerSystem + AssetLoader + SceneLoader> Host for T {}
