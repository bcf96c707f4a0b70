//=========================================================================
// Core Subsystems
//
// Everything the router coordinates, leaf-first:
//
// - `path`: container path parsing and resolution
// - `view`: identities, lifecycle state machine, instance registry
// - `request`: queue for hook-issued requests
// - `scene`: in-flight scene loads and completion signals
// - `config`: paths and the starting-view table
// - `host`: capabilities consumed from the engine
// - `error`: shared error taxonomy
//
// Notes:
// Execution is single-threaded. The registry is the only shared mutable
// state and is mutated solely through `get_or_create`/`remove`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
pub mod error;
pub mod host;
pub mod path;
pub mod request;
pub mod scene;
pub mod view;

//=== Public API ==========================================================

pub use config::{ScaffoldConfig, StartingViewEntry, StartingViewResolver};
pub use error::{Result, ScaffoldError};
pub use host::{ContainerHandle, Host, TemplateHandle};
pub use path::{ContainerPath, PathResolver};
pub use request::{RequestQueue, ViewRequest};
pub use scene::{LoadMode, SceneLoadCompletion, SceneLoadId, SceneLoadOutcome, SceneLoadRequest};
pub use view::{LifecycleState, View, ViewIdentity, ViewKind, ViewRegistry};
