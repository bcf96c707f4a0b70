//=========================================================================
// Scaffold Configuration
//=========================================================================
//
// Container paths, resource locations and the starting-view table.
//
// Loaded once at startup and handed to the router, which lends it to the
// registry and resolvers. Persisted as JSON; `load_or_create` writes a
// default file on first use.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::Result;
use crate::core::path::ContainerPath;
use crate::core::view::ViewKind;

//=== Module Declarations =================================================

mod starting_view;

//=== Public API ==========================================================

pub use starting_view::{scene_name_from_identifier, StartingViewEntry, StartingViewResolver};

//=== ScaffoldConfig ======================================================

/// Configuration shared by the navigation subsystems.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Asset folder that holds view templates.
    pub resources_path: String,

    /// Folder where view scripts are generated.
    pub scripts_path: String,

    /// Container path views are instantiated under.
    pub views_path: String,

    /// Container path for overlays. Shares `views_path` when unset.
    pub overlays_path: Option<String>,

    /// Container path for model objects.
    pub model_path: String,

    /// Root folder of the scaffolding assets.
    pub scaffolding_path: String,

    /// Whether view instances start active when instantiated.
    pub enable_all_objects: bool,

    starting_views: Vec<StartingViewEntry>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            resources_path: "Assets/Resources/Views/".to_string(),
            scripts_path: "Assets/Scripts/Views/".to_string(),
            views_path: "Views/".to_string(),
            overlays_path: None,
            model_path: "Model/".to_string(),
            scaffolding_path: "Assets/".to_string(),
            enable_all_objects: true,
            starting_views: Vec::new(),
        }
    }
}

impl ScaffoldConfig {
    //--- Container Paths --------------------------------------------------

    pub fn views_path(&self) -> Result<ContainerPath> {
        ContainerPath::parse(&self.views_path)
    }

    /// Overlay container path, falling back to the views path.
    pub fn overlays_path(&self) -> Result<ContainerPath> {
        match &self.overlays_path {
            Some(path) => ContainerPath::parse(path),
            None => self.views_path(),
        }
    }

    pub fn model_path(&self) -> Result<ContainerPath> {
        ContainerPath::parse(&self.model_path)
    }

    /// Container path instances of `kind` are parented under.
    pub fn container_path_for(&self, kind: ViewKind) -> Result<ContainerPath> {
        match kind {
            ViewKind::View => self.views_path(),
            ViewKind::Overlay => self.overlays_path(),
        }
    }

    //--- Resource Paths ---------------------------------------------------

    pub fn resources_path(&self) -> &str {
        &self.resources_path
    }

    /// Template search path relative to the resources root.
    ///
    /// Everything up to and including `Resources/` is stripped, so
    /// `Assets/Resources/Views/` becomes `Views/`.
    pub fn view_template_path(&self) -> String {
        const MARKER: &str = "Resources/";

        let relative = match self.resources_path.find(MARKER) {
            Some(index) => &self.resources_path[index + MARKER.len()..],
            None => self.resources_path.as_str(),
        };
        with_trailing_slash(relative)
    }

    /// Full template folder, with a trailing slash.
    pub fn full_view_template_path(&self) -> String {
        with_trailing_slash(&self.resources_path)
    }

    /// Script folder, with a trailing slash.
    pub fn scripts_path(&self) -> String {
        with_trailing_slash(&self.scripts_path)
    }

    //--- Starting Views ---------------------------------------------------

    pub fn starting_views(&self) -> &[StartingViewEntry] {
        &self.starting_views
    }

    /// Inserts or replaces the entry for `entry.scene_name`.
    ///
    /// Returns `true` when the entry was appended, `false` when it
    /// replaced an existing one.
    pub fn upsert_starting_view(&mut self, entry: StartingViewEntry) -> bool {
        match self
            .starting_views
            .iter_mut()
            .find(|existing| existing.scene_name == entry.scene_name)
        {
            Some(existing) => {
                debug!("Replacing starting view for scene `{}`", entry.scene_name);
                *existing = entry;
                false
            }
            None => {
                debug!("Adding starting view for scene `{}`", entry.scene_name);
                self.starting_views.push(entry);
                true
            }
        }
    }

    /// Resolver over this configuration's starting-view table.
    pub fn starting_view_resolver<'a>(&'a self, current_scene: &'a str) -> StartingViewResolver<'a> {
        StartingViewResolver::new(&self.starting_views, current_scene)
    }

    //--- Persistence ------------------------------------------------------

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading scaffold config from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        debug!("Saved scaffold config to {}", path.display());
        Ok(())
    }

    /// Loads the config at `path`, writing a default one first if the
    /// file does not exist yet.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        info!("No scaffold config at {}, creating default", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

//=== Tests ===============================================================
