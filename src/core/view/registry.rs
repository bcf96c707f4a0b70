//=========================================================================
// View Registry
//=========================================================================
//
// Tracks live view and overlay instances by identity.
//
// Instances are created on first use: the template is loaded by name,
// instantiated under the container resolved from the kind's configured
// path, and paired with the behaviour built by the factory registered for
// that name.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use serde_json::Value;

//=== Internal Dependencies ===============================================

use super::{
    Direction, Directive, LifecycleController, LifecycleState, NamedView, PassiveView,
    TransitionMode, View, ViewContext, ViewIdentity,
};
use crate::core::config::ScaffoldConfig;
use crate::core::error::Result;
use crate::core::host::{AssetLoader, ContainerHandle, ContainerSystem, TemplateHandle};
use crate::core::path::PathResolver;
use crate::core::request::{RequestQueue, ViewRequest};

//=== ViewFactory =========================================================

/// Builds the behaviour for a freshly created instance.
pub type ViewFactory = Box<dyn Fn() -> Box<dyn View> + Send>;

//=== InstanceId ==========================================================

/// Serial number of a created instance, unique per registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

//=== ViewInstance ========================================================

/// A live view or overlay: its host object, state machine and behaviour.
pub struct ViewInstance {
    id: InstanceId,
    identity: ViewIdentity,
    container: ContainerHandle,
    template: TemplateHandle,
    lifecycle: LifecycleController,
    queued_data: Option<Value>,
    behaviour: Box<dyn View>,
}

impl ViewInstance {
    /// Serial number assigned at creation.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn identity(&self) -> &ViewIdentity {
        &self.identity
    }

    /// Host object the template was instantiated into.
    pub fn container(&self) -> ContainerHandle {
        self.container
    }

    /// Template the instance was created from.
    pub fn template(&self) -> TemplateHandle {
        self.template
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    //--- Lifecycle Driving ------------------------------------------------

    /// Applies a visibility request and runs the resulting hooks.
    ///
    /// `data` reaches `on_show_start`, now or when a queued show is
    /// replayed. Returns the directive reported by the state machine.
    pub(crate) fn drive(
        &mut self,
        direction: Direction,
        data: Option<Value>,
        requests: &mut RequestQueue,
    ) -> Directive {
        let directive = self.lifecycle.request(direction);

        match directive {
            Directive::Begin(start) => {
                debug!("{} entering {:?}", self.identity, start);
                self.fire(start, data.as_ref(), requests);

                if self.behaviour.transition(direction) == TransitionMode::Immediate {
                    self.finish(requests);
                }
            }
            Directive::Queued => {
                debug!("{} busy, {:?} queued", self.identity, direction);
                self.queued_data = data;
            }
            Directive::Ignored => {
                debug!("{} ignoring redundant {:?}", self.identity, direction);
            }
        }

        if self.lifecycle.queued().is_none() {
            self.queued_data = None;
        }
        directive
    }

    /// Completes the in-flight transition, firing its completion hook.
    ///
    /// A request queued during the transition is pushed onto `requests`.
    /// Returns `false` when nothing was in flight.
    pub(crate) fn finish(&mut self, requests: &mut RequestQueue) -> bool {
        let Some(complete) = self.lifecycle.complete() else {
            return false;
        };

        debug!("{} entering {:?}", self.identity, complete);
        self.fire(complete, None, requests);

        let data = self.queued_data.take();
        match self.lifecycle.take_queued() {
            Some(Direction::Show) => requests.push(ViewRequest::Show(self.identity.clone(), data)),
            Some(Direction::Hide) => requests.push(ViewRequest::Hide(self.identity.clone())),
            None => {}
        }
        true
    }

    /// Runs the hook matching `state`. Only `ShowStart` receives `data`.
    pub(crate) fn fire(
        &mut self,
        state: LifecycleState,
        data: Option<&Value>,
        requests: &mut RequestQueue,
    ) {
        let mut ctx = ViewContext::new(&self.identity, self.container, requests);
        let view = &mut self.behaviour;

        match state {
            LifecycleState::Created => view.on_created(&mut ctx),
            LifecycleState::ShowStart => view.on_show_start(&mut ctx, data),
            LifecycleState::ShowComplete => view.on_show_complete(&mut ctx),
            LifecycleState::HideStart => view.on_hide_start(&mut ctx),
            LifecycleState::HideComplete => view.on_hide_complete(&mut ctx),
        }
    }
}

impl fmt::Debug for ViewInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewInstance")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("container", &self.container)
            .field("state", &self.lifecycle.state())
            .finish()
    }
}

//=== ViewRegistry ========================================================

/// Owns every live instance, at most one per identity.
pub struct ViewRegistry {
    instances: HashMap<ViewIdentity, ViewInstance>,
    factories: HashMap<String, ViewFactory>,
    next_id: u64,
}

impl ViewRegistry {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            factories: HashMap::new(),
            next_id: 1,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers the behaviour factory for views and overlays named `name`.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn View> + Send + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            warn!("View factory `{}` was already registered and has been replaced", name);
        }
    }

    /// Registers `T` under [`NamedView::NAME`], built with `T::default()`.
    pub fn register<T: NamedView>(&mut self) {
        self.register_factory(T::NAME, || Box::new(T::default()) as Box<dyn View>);
    }

    /// Whether a behaviour factory is registered for `name`.
    pub fn has_factory(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    //--- Instances --------------------------------------------------------

    /// Returns the live instance for `identity`, creating it on first use.
    ///
    /// Fails with `TemplateNotFound` when the host has no template for the
    /// name and `InvalidPath` when the kind's container path is empty.
    /// Nothing is registered on failure.
    pub fn get_or_create<H>(
        &mut self,
        identity: &ViewIdentity,
        host: &mut H,
        config: &ScaffoldConfig,
    ) -> Result<&mut ViewInstance>
    where
        H: ContainerSystem + AssetLoader + ?Sized,
    {
        match self.instances.entry(identity.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = config.container_path_for(identity.kind)?;
                let template =
                    host.load_template(identity.kind, &identity.name, &config.view_template_path())?;
                let parent = PathResolver::resolve(host, &path);
                let container =
                    host.instantiate(template, &identity.name, parent, config.enable_all_objects);

                let behaviour = match self.factories.get(&identity.name) {
                    Some(factory) => factory(),
                    None => {
                        debug!("No factory for `{}`, using passive view", identity.name);
                        Box::new(PassiveView) as Box<dyn View>
                    }
                };

                let id = InstanceId(self.next_id);
                self.next_id += 1;
                debug!("Created {} as {:?} under `{}`", identity, id, path);

                Ok(entry.insert(ViewInstance {
                    id,
                    identity: identity.clone(),
                    container,
                    template,
                    lifecycle: LifecycleController::new(),
                    queued_data: None,
                    behaviour,
                }))
            }
        }
    }

    /// Returns the live instance for `identity` without creating it.
    pub fn try_get(&self, identity: &ViewIdentity) -> Option<&ViewInstance> {
        self.instances.get(identity)
    }

    /// Mutable form of [`ViewRegistry::try_get`].
    pub fn try_get_mut(&mut self, identity: &ViewIdentity) -> Option<&mut ViewInstance> {
        self.instances.get_mut(identity)
    }

    /// Whether `identity` has a live instance.
    pub fn contains(&self, identity: &ViewIdentity) -> bool {
        self.instances.contains_key(identity)
    }

    /// Stops tracking `identity` and destroys its host object.
    pub fn remove<C>(&mut self, identity: &ViewIdentity, containers: &mut C) -> Option<ViewInstance>
    where
        C: ContainerSystem + ?Sized,
    {
        let instance = self.instances.remove(identity)?;
        debug!("Removing {} ({:?})", identity, instance.id);
        containers.destroy(instance.container);
        Some(instance)
    }

    /// Identities of all live instances, in no particular order.
    pub fn identities(&self) -> impl Iterator<Item = &ViewIdentity> {
        self.instances.keys()
    }

    /// Returns the number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if no instance is live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ScaffoldError;
    use crate::core::host::testing::FakeHost;
    use crate::core::view::ViewKind;
    use serde_json::json;

    #[derive(Default)]
    struct Menu;

    impl View for Menu {
        fn transition(&mut self, _direction: Direction) -> TransitionMode {
            TransitionMode::Deferred
        }
    }

    impl NamedView for Menu {
        const NAME: &'static str = "Menu";
    }

    #[test]
    fn get_or_create_returns_same_instance() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();
        let menu = ViewIdentity::view("Menu");

        let (first_id, first_container) = {
            let instance = registry.get_or_create(&menu, &mut host, &config).unwrap();
            (instance.id(), instance.container())
        };
        let created = host.created_count();

        let instance = registry.get_or_create(&menu, &mut host, &config).unwrap();
        assert_eq!(instance.id(), first_id);
        assert_eq!(instance.container(), first_container);
        assert_eq!(host.created_count(), created);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn instance_is_parented_under_views_container() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();

        let (container, template) = {
            let instance = registry
                .get_or_create(&ViewIdentity::view("Menu"), &mut host, &config)
                .unwrap();
            (instance.container(), instance.template())
        };

        let views = host.find_top_level("Views").unwrap();
        assert!(host.is_tagged(views));
        assert_eq!(host.container(container).parent, Some(views));
        assert_eq!(host.container(container).name, "Menu");
        assert_eq!(host.container(container).template, Some(template));
        assert_eq!(Some(template), host.templates.get("Menu").copied());
        assert!(host.container(container).active);
        assert_eq!(
            host.template_lookups,
            vec![(ViewKind::View, "Menu".to_string(), "Views/".to_string())]
        );
    }

    #[test]
    fn overlays_use_configured_path() {
        let mut host = FakeHost::with_templates(&["Toast"]);
        let mut config = ScaffoldConfig::default();
        config.overlays_path = Some("UI/Overlays".to_string());
        let mut registry = ViewRegistry::new();

        let container = registry
            .get_or_create(&ViewIdentity::overlay("Toast"), &mut host, &config)
            .unwrap()
            .container();

        let parent = host.container(container).parent.unwrap();
        assert_eq!(host.container(parent).name, "Overlays");
    }

    #[test]
    fn view_and_overlay_with_same_name_are_distinct() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();

        let a = registry
            .get_or_create(&ViewIdentity::view("Menu"), &mut host, &config)
            .unwrap()
            .id();
        let b = registry
            .get_or_create(&ViewIdentity::overlay("Menu"), &mut host, &config)
            .unwrap()
            .id();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn missing_template_registers_nothing() {
        let mut host = FakeHost::new();
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();
        let ghost = ViewIdentity::view("Ghost");

        let err = registry.get_or_create(&ghost, &mut host, &config).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateNotFound { ref name, .. } if name == "Ghost"));
        assert!(!registry.contains(&ghost));
        assert_eq!(host.created_count(), 0);
    }

    #[test]
    fn invalid_container_path_registers_nothing() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let mut config = ScaffoldConfig::default();
        config.views_path = "//".to_string();
        let mut registry = ViewRegistry::new();

        let err = registry
            .get_or_create(&ViewIdentity::view("Menu"), &mut host, &config)
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidPath(_)));
        assert!(registry.is_empty());
        assert!(host.template_lookups.is_empty());
    }

    #[test]
    fn disabled_objects_are_instantiated_inactive() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let mut config = ScaffoldConfig::default();
        config.enable_all_objects = false;
        let mut registry = ViewRegistry::new();

        let container = registry
            .get_or_create(&ViewIdentity::view("Menu"), &mut host, &config)
            .unwrap()
            .container();

        assert!(!host.container(container).active);
        // Parent containers are unaffected
        let views = host.find_top_level("Views").unwrap();
        assert!(host.container(views).active);
    }

    #[test]
    fn remove_destroys_and_allows_recreation() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();
        let menu = ViewIdentity::view("Menu");

        let first = registry.get_or_create(&menu, &mut host, &config).unwrap().id();
        let removed = registry.remove(&menu, &mut host).unwrap();
        assert_eq!(removed.id(), first);
        assert!(host.container(removed.container()).destroyed);
        assert!(registry.try_get(&menu).is_none());
        assert!(registry.remove(&menu, &mut host).is_none());

        let second = registry.get_or_create(&menu, &mut host, &config).unwrap().id();
        assert_ne!(first, second);
    }

    #[test]
    fn registered_factory_supplies_behaviour() {
        let mut host = FakeHost::with_templates(&["Menu", "Plain"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();
        registry.register::<Menu>();
        assert!(registry.has_factory("Menu"));

        let mut requests = RequestQueue::new();

        // Menu defers its transition, so it stays in ShowStart
        let menu = registry
            .get_or_create(&ViewIdentity::view("Menu"), &mut host, &config)
            .unwrap();
        menu.drive(Direction::Show, None, &mut requests);
        assert_eq!(menu.state(), LifecycleState::ShowStart);
        assert!(menu.finish(&mut requests));
        assert_eq!(menu.state(), LifecycleState::ShowComplete);

        // Unregistered names fall back to an immediate passive view
        let plain = registry
            .get_or_create(&ViewIdentity::view("Plain"), &mut host, &config)
            .unwrap();
        plain.drive(Direction::Show, None, &mut requests);
        assert_eq!(plain.state(), LifecycleState::ShowComplete);
        assert!(!plain.finish(&mut requests));
    }

    #[test]
    fn queued_request_is_replayed_through_queue() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();
        registry.register::<Menu>();
        let mut requests = RequestQueue::new();
        let id = ViewIdentity::view("Menu");

        let menu = registry.get_or_create(&id, &mut host, &config).unwrap();
        menu.drive(Direction::Show, None, &mut requests);
        assert_eq!(menu.drive(Direction::Hide, None, &mut requests), Directive::Queued);
        assert!(requests.is_empty());

        menu.finish(&mut requests);
        assert_eq!(requests.take(), vec![ViewRequest::Hide(id)]);
    }

    #[test]
    fn queued_show_keeps_its_payload() {
        let mut host = FakeHost::with_templates(&["Menu"]);
        let config = ScaffoldConfig::default();
        let mut registry = ViewRegistry::new();
        registry.register::<Menu>();
        let mut requests = RequestQueue::new();
        let id = ViewIdentity::view("Menu");

        let menu = registry.get_or_create(&id, &mut host, &config).unwrap();
        menu.drive(Direction::Show, None, &mut requests);
        menu.finish(&mut requests);
        menu.drive(Direction::Hide, None, &mut requests);

        let data = json!({ "score": 10 });
        assert_eq!(
            menu.drive(Direction::Show, Some(data.clone()), &mut requests),
            Directive::Queued
        );
        menu.finish(&mut requests);
        assert_eq!(requests.take(), vec![ViewRequest::Show(id.clone(), Some(data))]);

        // A cancelled show leaves no payload behind
        menu.drive(Direction::Show, None, &mut requests);
        menu.finish(&mut requests);
        menu.drive(Direction::Hide, None, &mut requests);
        menu.drive(Direction::Show, Some(json!(1)), &mut requests);
        menu.drive(Direction::Hide, None, &mut requests);
        menu.finish(&mut requests);
        assert!(requests.is_empty());
    }
}
