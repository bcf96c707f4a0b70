//=========================================================================
// Starting Views
//=========================================================================
//
// Maps scene names to the view shown automatically when the scene
// becomes active.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::view::{ViewIdentity, ViewKind};

//=== StartingViewEntry ===================================================

/// Starting view configured for one scene.
///
/// An empty `view_name` means no specific view; the host decides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingViewEntry {
    pub scene_name: String,
    pub view_name: String,
    pub view_index: i32,
    pub view_type: ViewKind,
}

impl StartingViewEntry {
    /// Identity of the configured view, or `None` when no view is named.
    pub fn identity(&self) -> Option<ViewIdentity> {
        if self.view_name.is_empty() {
            None
        } else {
            Some(ViewIdentity::new(self.view_name.clone(), self.view_type))
        }
    }
}

//=== StartingViewResolver ================================================

/// Looks up the starting view for a scene, synthesizing a default when
/// the table has no entry.
pub struct StartingViewResolver<'a> {
    table: &'a [StartingViewEntry],
    current_scene: &'a str,
}

impl<'a> StartingViewResolver<'a> {
    /// `current_scene` is the host's raw identifier of the active scene.
    pub fn new(table: &'a [StartingViewEntry], current_scene: &'a str) -> Self {
        Self {
            table,
            current_scene,
        }
    }

    /// First entry for `scene_name`, or the default entry.
    pub fn resolve(&self, scene_name: &str) -> StartingViewEntry {
        self.table
            .iter()
            .find(|entry| entry.scene_name == scene_name)
            .cloned()
            .unwrap_or_else(|| self.default_entry())
    }

    /// Entry for the active scene with no view named.
    pub fn default_entry(&self) -> StartingViewEntry {
        StartingViewEntry {
            scene_name: scene_name_from_identifier(self.current_scene).to_string(),
            view_name: String::new(),
            view_index: 0,
            view_type: ViewKind::View,
        }
    }
}

/// Strips directory and file extension from a scene identifier.
///
/// `Assets/Scenes/DemoScene.unity` becomes `DemoScene`.
pub fn scene_name_from_identifier(identifier: &str) -> &str {
    let file = match identifier.rfind('/') {
        Some(index) => &identifier[index + 1..],
        None => identifier,
    };

    match file.rfind('.') {
        Some(index) if index > 0 => &file[..index],
        _ => file,
    }
}

//=== Tests ===============================================================
