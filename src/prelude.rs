//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_scaffold::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Router
pub use crate::router::{ViewRouter, ViewRouterBuilder};

// Errors
pub use crate::core::error::{Result, ScaffoldError};

// Configuration
pub use crate::core::config::{ScaffoldConfig, StartingViewEntry};

// Views
pub use crate::core::view::{
    Direction, LifecycleState, NamedView, TransitionMode, View, ViewContext, ViewIdentity,
    ViewKind,
};

// Scenes
pub use crate::core::scene::{LoadMode, SceneLoadCompletion, SceneLoadId, SceneLoadOutcome};

// Host contract
pub use crate::core::host::{
    AssetLoader, ContainerHandle, ContainerSystem, Host, SceneLoader, TemplateHandle,
};
