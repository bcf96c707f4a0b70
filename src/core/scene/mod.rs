//=========================================================================
// Scene Loads
//=========================================================================
//
// Tracks in-flight scene loads and their completion signals.
//
// Architecture:
//   ViewRouter ──begin()──> SceneLoadTracker ──SceneLoadCompletion──> Host
//                                ▲                                     │
//                                └──── crossbeam channel <── succeed()/fail()
//
// Each completion is consumed by value, so a load reports at most once.
// The router drains finished loads at frame boundaries via `drain()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::Result;
use crate::core::view::ViewIdentity;

//=== LoadMode ============================================================

/// How a scene is loaded relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadMode {
    /// Replaces the active scene.
    #[default]
    Single,

    /// Loads alongside the active scene, asynchronously.
    AdditiveAsync,
}

//=== SceneLoadId =========================================================

/// Identifier of a single scene-load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneLoadId(u64);

impl SceneLoadId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneLoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

//=== SceneLoadRequest ====================================================

/// An in-flight scene load and the view to show once it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLoadRequest {
    pub id: SceneLoadId,
    pub scene_name: String,
    pub mode: LoadMode,
    pub pending_view: Option<ViewIdentity>,
}

//=== SceneLoadOutcome ====================================================

/// Result of a finished scene load, as reported by
/// [`crate::ViewRouter::poll_scene_loads`].
///
/// `Ok(Some(view))` means the load succeeded and `view` was shown,
/// `Ok(None)` that it succeeded with nothing to show.
#[derive(Debug)]
pub struct SceneLoadOutcome {
    pub request: SceneLoadRequest,
    pub result: Result<Option<ViewIdentity>>,
}

//=== SceneLoadCompletion =================================================

#[derive(Debug)]
pub(crate) struct SceneLoadEvent {
    id: SceneLoadId,
    result: std::result::Result<(), String>,
}

/// One-shot completion signal handed to the [`crate::SceneLoader`].
///
/// Consumed by [`succeed`](Self::succeed) or [`fail`](Self::fail).
/// Dropping it without either reports a failure.
#[derive(Debug)]
pub struct SceneLoadCompletion {
    id: SceneLoadId,
    scene: String,
    sender: Option<Sender<SceneLoadEvent>>,
}

impl SceneLoadCompletion {
    pub fn id(&self) -> SceneLoadId {
        self.id
    }

    /// Scene this completion belongs to.
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// Signals that the scene finished loading.
    pub fn succeed(mut self) {
        self.send(Ok(()));
    }

    /// Signals that the scene failed to load.
    pub fn fail(mut self, reason: impl Into<String>) {
        self.send(Err(reason.into()));
    }

    fn send(&mut self, result: std::result::Result<(), String>) {
        if let Some(sender) = self.sender.take() {
            // The tracker may be gone if the router was dropped mid-load
            if sender.send(SceneLoadEvent { id: self.id, result }).is_err() {
                debug!("Scene load {} finished after its router was dropped", self.id);
            }
        }
    }
}

impl Drop for SceneLoadCompletion {
    fn drop(&mut self) {
        if self.sender.is_some() {
            warn!("Completion for scene `{}` dropped without a result", self.scene);
            self.send(Err("completion dropped without a result".to_string()));
        }
    }
}

//=== SceneLoadTracker ====================================================

/// Owns in-flight scene-load requests and the completion channel.
pub struct SceneLoadTracker {
    sender: Sender<SceneLoadEvent>,
    receiver: Receiver<SceneLoadEvent>,
    pending: HashMap<SceneLoadId, SceneLoadRequest>,
    next_id: u64,
}

impl SceneLoadTracker {
    /// Upper bound on completions handled per drain, so a flood of
    /// signals cannot stall a frame.
    const MAX_COMPLETIONS_PER_DRAIN: usize = 64;

    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: HashMap::new(),
            next_id: 1,
        }
    }

    /// Records a new request and returns its completion signal.
    pub fn begin(
        &mut self,
        scene: &str,
        mode: LoadMode,
        pending_view: Option<ViewIdentity>,
    ) -> SceneLoadCompletion {
        let id = SceneLoadId(self.next_id);
        self.next_id += 1;

        debug!("Tracking scene load {} for `{}` ({:?})", id, scene, mode);
        self.pending.insert(
            id,
            SceneLoadRequest {
                id,
                scene_name: scene.to_string(),
                mode,
                pending_view,
            },
        );

        SceneLoadCompletion {
            id,
            scene: scene.to_string(),
            sender: Some(self.sender.clone()),
        }
    }

    /// Returns the loads that finished since the last drain, in signal
    /// order, paired with the host-reported result.
    pub fn drain(&mut self) -> Vec<(SceneLoadRequest, std::result::Result<(), String>)> {
        let mut finished = Vec::new();

        while finished.len() < Self::MAX_COMPLETIONS_PER_DRAIN {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                // Unreachable while the tracker holds its own sender
                Err(TryRecvError::Disconnected) => break,
            };

            match self.pending.remove(&event.id) {
                Some(request) => finished.push((request, event.result)),
                None => warn!("Ignoring completion for unknown scene load {}", event.id),
            }
        }

        finished
    }

    pub fn is_pending(&self, id: SceneLoadId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &SceneLoadRequest> {
        self.pending.values()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for SceneLoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
