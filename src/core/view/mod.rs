//=========================================================================
// View System
//=========================================================================
//
// Views and overlays, their identities and lifecycle hooks.
//
// Architecture:
//   ViewRegistry
//     └─ instances: HashMap<ViewIdentity, ViewInstance>
//          ├─ lifecycle: LifecycleController
//          └─ behaviour: Box<dyn View>
//
// Flow:
//   ViewRouter → ViewRegistry::get_or_create() → LifecycleController::request()
//              → View hooks (may queue further requests via ViewContext)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

//=== Internal Dependencies ===============================================

use crate::core::host::ContainerHandle;
use crate::core::request::{RequestQueue, ViewRequest};
use crate::core::scene::LoadMode;

//=== Module Declarations =================================================

mod lifecycle;
mod registry;

//=== Public API ==========================================================

pub use lifecycle::{Directive, LifecycleController, LifecycleState};
pub use registry::{InstanceId, ViewFactory, ViewInstance, ViewRegistry};

//=== ViewKind ============================================================

/// Distinguishes full-screen views from overlays layered above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewKind {
    #[default]
    View,
    Overlay,
}

//=== ViewIdentity ========================================================

/// Name and kind of a navigable screen.
///
/// The registry tracks at most one live instance per identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewIdentity {
    pub name: String,
    pub kind: ViewKind,
}

impl ViewIdentity {
    pub fn new(name: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Identity of a full-screen view.
    pub fn view(name: impl Into<String>) -> Self {
        Self::new(name, ViewKind::View)
    }

    /// Identity of an overlay.
    pub fn overlay(name: impl Into<String>) -> Self {
        Self::new(name, ViewKind::Overlay)
    }
}

impl fmt::Display for ViewIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViewKind::View => write!(f, "view `{}`", self.name),
            ViewKind::Overlay => write!(f, "overlay `{}`", self.name),
        }
    }
}

//=== Direction / TransitionMode ==========================================

/// Direction of a visibility transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Show,
    Hide,
}

/// How a view finishes its visual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionMode {
    /// The completion hook fires as soon as the start hook returns.
    #[default]
    Immediate,

    /// The host reports completion later through
    /// [`crate::ViewRouter::complete_transition`].
    Deferred,
}

//=== View Trait ==========================================================

/// Behaviour attached to a view or overlay instance.
///
/// Every hook has an empty default implementation. Hooks receive a
/// [`ViewContext`] and may issue further requests through it; those are
/// queued and processed after the current transition's hooks return.
///
/// ```rust
/// # use aetheric_scaffold::prelude::*;
/// #[derive(Default)]
/// struct MainMenu;
///
/// impl NamedView for MainMenu {
///     const NAME: &'static str = "MainMenu";
/// }
///
/// impl View for MainMenu {
///     fn on_hide_start(&mut self, ctx: &mut ViewContext<'_>) {
///         ctx.request_overlay("LoadingOverlay");
///     }
/// }
/// ```
pub trait View: Send {
    /// Called once, right after the instance is created.
    fn on_created(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// Called before the show transition begins, with the payload the
    /// show was requested with.
    fn on_show_start(&mut self, _ctx: &mut ViewContext<'_>, _data: Option<&Value>) {}

    /// Called once the show transition has finished.
    fn on_show_complete(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// Called before the hide transition begins.
    fn on_hide_start(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// Called once the hide transition has finished.
    fn on_hide_complete(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// Starts the visual transition for `direction`.
    fn transition(&mut self, _direction: Direction) -> TransitionMode {
        TransitionMode::Immediate
    }
}

/// Static name binding for view types, used for registration and requests.
pub trait NamedView: View + Default + 'static {
    const NAME: &'static str;
}

/// View with no behaviour, used when no factory is registered for a name.
#[derive(Debug, Default)]
pub struct PassiveView;

impl View for PassiveView {}

//=== ViewContext =========================================================

/// Context handed to view hooks.
///
/// Requests made here are not executed immediately; they are queued and
/// drained by the router once the running hook returns.
pub struct ViewContext<'a> {
    identity: &'a ViewIdentity,
    container: ContainerHandle,
    requests: &'a mut RequestQueue,
}

impl<'a> ViewContext<'a> {
    pub(crate) fn new(
        identity: &'a ViewIdentity,
        container: ContainerHandle,
        requests: &'a mut RequestQueue,
    ) -> Self {
        Self {
            identity,
            container,
            requests,
        }
    }

    /// Identity of the view whose hook is running.
    pub fn identity(&self) -> &ViewIdentity {
        self.identity
    }

    /// Container the view was instantiated into.
    pub fn container(&self) -> ContainerHandle {
        self.container
    }

    //--- Requests ---------------------------------------------------------

    pub fn request_view(&mut self, name: impl Into<String>) {
        self.requests.push(ViewRequest::show(ViewIdentity::view(name)));
    }

    /// Shows a view and hands `data` to its `on_show_start`.
    pub fn request_view_with(&mut self, name: impl Into<String>, data: Value) {
        self.requests
            .push(ViewRequest::Show(ViewIdentity::view(name), Some(data)));
    }

    pub fn request_view_close(&mut self, name: impl Into<String>) {
        self.requests.push(ViewRequest::Hide(ViewIdentity::view(name)));
    }

    pub fn request_overlay(&mut self, name: impl Into<String>) {
        self.requests.push(ViewRequest::show(ViewIdentity::overlay(name)));
    }

    pub fn request_overlay_with(&mut self, name: impl Into<String>, data: Value) {
        self.requests
            .push(ViewRequest::Show(ViewIdentity::overlay(name), Some(data)));
    }

    pub fn request_overlay_close(&mut self, name: impl Into<String>) {
        self.requests.push(ViewRequest::Hide(ViewIdentity::overlay(name)));
    }

    /// Requests a scene load with no view attached.
    pub fn request_scene(&mut self, mode: LoadMode, scene: impl Into<String>) {
        self.requests.push(ViewRequest::LoadScene {
            mode,
            scene: scene.into(),
            pending_view: None,
        });
    }

    /// Requests a scene load and shows `identity` once it completes.
    pub fn request_scene_with_view(
        &mut self,
        identity: ViewIdentity,
        mode: LoadMode,
        scene: impl Into<String>,
    ) {
        self.requests.push(ViewRequest::LoadScene {
            mode,
            scene: scene.into(),
            pending_view: Some(identity),
        });
    }
}

//=== Tests ===============================================================
