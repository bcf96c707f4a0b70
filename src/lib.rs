//=========================================================================
// Aetheric Scaffold — Library Root
//
// View and overlay navigation layered on top of a host game engine.
//
// Responsibilities:
// - Expose the request facade (`ViewRouter`) and its builder
// - Define the host contract (`core::host`) the engine binding implements
// - Keep lifecycle sequencing, container provisioning and scene-load
//   continuations inside the crate
//
// Typical usage:
// ```ignore
// use aetheric_scaffold::prelude::*;
//
// let mut router = ViewRouterBuilder::new(engine_host)
//     .with_config(ScaffoldConfig::load_or_create("scaffold.json")?)
//     .build();
//
// router.start()?;
// router.request_scene_with_view(ViewIdentity::view("MainMenu"), LoadMode::AdditiveAsync, "DemoScene");
//
// // once per frame
// for outcome in router.poll_scene_loads() { /* ... */ }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the subsystems (config, paths, views, scenes, host traits).
// It is public for engine bindings; application code mostly needs the
// prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `router` defines the request facade and its builder.
//
mod router;

//--- Public Exports ------------------------------------------------------

pub use crate::core::error::{Result, ScaffoldError};
pub use crate::core::host::{AssetLoader, ContainerSystem, Host, SceneLoader};
pub use router::{ViewRouter, ViewRouterBuilder};
