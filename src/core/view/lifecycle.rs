//=========================================================================
// Lifecycle Controller
//=========================================================================
//
// Show/hide state machine for a single view instance.
//
//   Created ──show──> ShowStart ──complete──> ShowComplete
//      ▲                                          │
//      │ (never re-entered)                      hide
//                                                 ▼
//   HideComplete <──complete── HideStart <────────┘
//        │
//        └──show──> ShowStart ...
//
// Requests that arrive mid-transition are queued (latest wins) and
// handed back once the in-flight transition completes.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::Direction;

//=== LifecycleState ======================================================

/// Lifecycle phase of a view instance. Each phase has a matching hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Created,
    ShowStart,
    ShowComplete,
    HideStart,
    HideComplete,
}

impl LifecycleState {
    /// Direction of the transition in flight, if any.
    pub fn in_flight(self) -> Option<Direction> {
        match self {
            Self::ShowStart => Some(Direction::Show),
            Self::HideStart => Some(Direction::Hide),
            _ => None,
        }
    }

    /// True while showing or shown.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::ShowStart | Self::ShowComplete)
    }
}

//=== Directive ===========================================================

/// Outcome of a visibility request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// A transition started; the controller is now in the given start state.
    Begin(LifecycleState),

    /// A transition is in flight; the request will be replayed afterwards.
    Queued,

    /// The instance is already in (or heading to) the requested visibility.
    Ignored,
}

//=== LifecycleController =================================================

#[derive(Debug, Default)]
pub struct LifecycleController {
    state: LifecycleState,
    queued: Option<Direction>,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Request queued behind the in-flight transition.
    pub fn queued(&self) -> Option<Direction> {
        self.queued
    }

    //--- Transitions ------------------------------------------------------

    /// Applies a visibility request.
    ///
    /// Starts a transition when the request changes visibility and nothing
    /// is in flight. While a transition runs, the most recent request that
    /// differs from it is kept for replay; one that matches it cancels any
    /// queued request.
    pub fn request(&mut self, direction: Direction) -> Directive {
        if let Some(in_flight) = self.state.in_flight() {
            if direction == in_flight {
                self.queued = None;
                return Directive::Ignored;
            }
            debug!("Queueing {:?} behind in-flight {:?}", direction, in_flight);
            self.queued = Some(direction);
            return Directive::Queued;
        }

        let next = match (self.state, direction) {
            (LifecycleState::Created | LifecycleState::HideComplete, Direction::Show) => {
                LifecycleState::ShowStart
            }
            (LifecycleState::ShowComplete, Direction::Hide) => LifecycleState::HideStart,
            _ => return Directive::Ignored,
        };

        self.state = next;
        Directive::Begin(next)
    }

    /// Finishes the in-flight transition.
    ///
    /// Returns the completion state entered, or `None` when nothing was in
    /// flight.
    pub fn complete(&mut self) -> Option<LifecycleState> {
        let next = match self.state {
            LifecycleState::ShowStart => LifecycleState::ShowComplete,
            LifecycleState::HideStart => LifecycleState::HideComplete,
            _ => return None,
        };

        self.state = next;
        Some(next)
    }

    /// Takes the request queued during the last transition.
    pub fn take_queued(&mut self) -> Option<Direction> {
        self.queued.take()
    }
}

//=== Tests ===============================================================
