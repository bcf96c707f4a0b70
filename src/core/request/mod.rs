//=========================================================================
// Request Queue
//=========================================================================
//
// Queue for requests issued from inside view hooks.
//
// Hooks push requests here while a transition runs. The router drains
// the queue after the hooks return, so the state machine is never
// re-entered mid-transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde_json::Value;

//=== Internal Dependencies ===============================================

use crate::core::scene::LoadMode;
use crate::core::view::ViewIdentity;

//=== ViewRequest =========================================================

/// A deferred navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    /// Shows a view or overlay, creating it when needed. The payload is
    /// handed to `on_show_start`.
    Show(ViewIdentity, Option<Value>),

    /// Hides a live view or overlay.
    Hide(ViewIdentity),

    /// Loads a scene, optionally showing a view once it completes.
    LoadScene {
        mode: LoadMode,
        scene: String,
        pending_view: Option<ViewIdentity>,
    },
}

impl ViewRequest {
    /// Show request without a payload.
    pub fn show(identity: ViewIdentity) -> Self {
        Self::Show(identity, None)
    }

    /// Identity targeted by a show or hide request.
    pub fn identity(&self) -> Option<&ViewIdentity> {
        match self {
            Self::Show(identity, _) | Self::Hide(identity) => Some(identity),
            Self::LoadScene { .. } => None,
        }
    }
}

//=== RequestQueue ========================================================

/// FIFO of requests waiting for the current transition to finish.
#[derive(Debug, Default)]
pub struct RequestQueue {
    queue: Vec<ViewRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a request for the next drain.
    pub fn push(&mut self, request: ViewRequest) {
        self.queue.push(request);
    }

    /// Iterates queued requests in the order they will run.
    pub fn iter(&self) -> impl Iterator<Item = &ViewRequest> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all queued requests, leaving the queue empty.
    ///
    /// Requests pushed while the returned batch is processed land in a
    /// fresh batch.
    pub fn take(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.queue)
    }
}

//=== Tests ===============================================================
