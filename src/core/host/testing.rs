//=========================================================================
// In-Memory Host (tests only)
//=========================================================================
//
// Records every call so tests can assert on container creation, template
// lookups and scene-load traffic.
//
//=========================================================================

use std::collections::HashMap;

use super::{AssetLoader, ContainerHandle, ContainerSystem, SceneLoader, TemplateHandle};
use crate::core::error::{Result, ScaffoldError};
use crate::core::scene::{LoadMode, SceneLoadCompletion};
use crate::core::view::ViewKind;

#[derive(Debug, Clone)]
pub(crate) struct FakeContainer {
    pub name: String,
    pub parent: Option<ContainerHandle>,
    pub tagged: bool,
    pub template: Option<TemplateHandle>,
    pub active: bool,
    pub destroyed: bool,
}

pub(crate) struct FakeHost {
    pub containers: Vec<FakeContainer>,
    pub templates: HashMap<String, TemplateHandle>,
    pub template_lookups: Vec<(ViewKind, String, String)>,
    pub scene_loads: Vec<(LoadMode, String)>,
    pub completions: Vec<SceneLoadCompletion>,
    pub current_scene: String,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            templates: HashMap::new(),
            template_lookups: Vec::new(),
            scene_loads: Vec::new(),
            completions: Vec::new(),
            current_scene: "Assets/Scenes/StartingScene.unity".to_string(),
        }
    }

    pub fn with_templates(names: &[&str]) -> Self {
        let mut host = Self::new();
        for name in names {
            host.add_template(name);
        }
        host
    }

    pub fn add_template(&mut self, name: &str) {
        let handle = TemplateHandle::new(self.templates.len() as u64 + 1);
        self.templates.insert(name.to_string(), handle);
    }

    pub fn container(&self, handle: ContainerHandle) -> &FakeContainer {
        &self.containers[handle.raw() as usize]
    }

    /// Number of containers ever created, including instantiated views.
    pub fn created_count(&self) -> usize {
        self.containers.len()
    }

    /// Takes the oldest outstanding scene-load completion.
    pub fn take_completion(&mut self) -> SceneLoadCompletion {
        assert!(!self.completions.is_empty(), "no scene load in flight");
        self.completions.remove(0)
    }

    fn push(&mut self, container: FakeContainer) -> ContainerHandle {
        self.containers.push(container);
        ContainerHandle::new(self.containers.len() as u64 - 1)
    }

    fn find(&self, parent: Option<ContainerHandle>, name: &str) -> Option<ContainerHandle> {
        self.containers
            .iter()
            .position(|c| !c.destroyed && c.parent == parent && c.name == name)
            .map(|index| ContainerHandle::new(index as u64))
    }
}

impl ContainerSystem for FakeHost {
    fn find_top_level(&self, name: &str) -> Option<ContainerHandle> {
        self.find(None, name)
    }

    fn find_child(&self, parent: ContainerHandle, name: &str) -> Option<ContainerHandle> {
        self.find(Some(parent), name)
    }

    fn create_container(&mut self, name: &str, parent: Option<ContainerHandle>) -> ContainerHandle {
        self.push(FakeContainer {
            name: name.to_string(),
            parent,
            tagged: false,
            template: None,
            active: true,
            destroyed: false,
        })
    }

    fn is_tagged(&self, container: ContainerHandle) -> bool {
        self.container(container).tagged
    }

    fn tag(&mut self, container: ContainerHandle) {
        self.containers[container.raw() as usize].tagged = true;
    }

    fn instantiate(
        &mut self,
        template: TemplateHandle,
        name: &str,
        parent: ContainerHandle,
        active: bool,
    ) -> ContainerHandle {
        self.push(FakeContainer {
            name: name.to_string(),
            parent: Some(parent),
            tagged: false,
            template: Some(template),
            active,
            destroyed: false,
        })
    }

    fn destroy(&mut self, container: ContainerHandle) {
        self.containers[container.raw() as usize].destroyed = true;

        // Cascade to descendants
        let mut changed = true;
        while changed {
            changed = false;
            for index in 0..self.containers.len() {
                let orphaned = match self.containers[index].parent {
                    Some(parent) => self.containers[parent.raw() as usize].destroyed,
                    None => false,
                };
                if orphaned && !self.containers[index].destroyed {
                    self.containers[index].destroyed = true;
                    changed = true;
                }
            }
        }
    }
}

impl AssetLoader for FakeHost {
    fn load_template(
        &mut self,
        kind: ViewKind,
        name: &str,
        search_path: &str,
    ) -> Result<TemplateHandle> {
        self.template_lookups
            .push((kind, name.to_string(), search_path.to_string()));
        self.templates
            .get(name)
            .copied()
            .ok_or_else(|| ScaffoldError::template_not_found(kind, name))
    }
}

impl SceneLoader for FakeHost {
    fn load_scene(&mut self, mode: LoadMode, scene: &str, completion: SceneLoadCompletion) {
        self.scene_loads.push((mode, scene.to_string()));
        self.completions.push(completion);
    }

    fn current_scene(&self) -> String {
        self.current_scene.clone()
    }
}
