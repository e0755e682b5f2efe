mod registry;

pub use registry::ModuleRegistry;

use crate::di::{InjectionToken, InstanceWrapper, SharedInstance};
use crate::error::{LifelineError, Result};
use indexmap::IndexMap;
use uuid::Uuid;

/// A module's instantiated providers, controllers and enhancers
///
/// The module's own instance is kept apart from the other providers and
/// always comes first when providers are listed, so lifecycle hooks can
/// call it last.
///
/// # Example
/// ```
/// use lifeline::di::{InstanceWrapper, shared};
/// use lifeline::lifecycle::LifecycleHooks;
/// use lifeline::module::Module;
///
/// struct AppModule;
/// impl LifecycleHooks for AppModule {}
///
/// struct UserService;
/// impl LifecycleHooks for UserService {}
///
/// let mut module = Module::of(AppModule);
/// module
///     .add_provider(InstanceWrapper::singleton("UserService", shared(UserService)))
///     .unwrap();
/// assert_eq!(module.providers().count(), 2);
/// ```
pub struct Module {
    id: Uuid,
    own: InstanceWrapper,
    distance: usize,
    providers: IndexMap<InjectionToken, InstanceWrapper>,
    controllers: IndexMap<InjectionToken, InstanceWrapper>,
    injectables: IndexMap<InjectionToken, InstanceWrapper>,
}

impl Module {
    /// Create a module from its token and its own instance, if any
    pub fn new(token: impl Into<InjectionToken>, instance: Option<SharedInstance>) -> Self {
        let token = token.into();
        let own = match instance {
            Some(instance) => InstanceWrapper::singleton(token, instance),
            None => InstanceWrapper::unresolved(token, Default::default()),
        };
        Self {
            id: Uuid::new_v4(),
            own,
            distance: 0,
            providers: IndexMap::new(),
            controllers: IndexMap::new(),
            injectables: IndexMap::new(),
        }
    }

    /// Create a module keyed by the type of its instance
    pub fn of<M: crate::lifecycle::LifecycleHooks>(instance: M) -> Self {
        Self::new(InjectionToken::of::<M>(), Some(crate::di::shared(instance)))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &InjectionToken {
        self.own.token()
    }

    pub fn name(&self) -> &str {
        self.own.token().name()
    }

    /// The module's own instance, if it was created
    pub fn instance(&self) -> Option<&SharedInstance> {
        self.own.instance()
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    pub fn set_distance(&mut self, distance: usize) -> &mut Self {
        self.distance = distance;
        self
    }

    /// Register a provider
    ///
    /// A provider with an already registered token replaces the old one in place.
    pub fn add_provider(&mut self, wrapper: InstanceWrapper) -> Result<&mut Self> {
        if wrapper.token() == self.own.token() {
            return Err(LifelineError::ModuleRegistrationFailed {
                message: format!(
                    "provider '{}' would replace the instance of module '{}'",
                    wrapper.token(),
                    self.name()
                ),
            });
        }
        self.providers.insert(wrapper.token().clone(), wrapper);
        Ok(self)
    }

    pub fn add_controller(&mut self, wrapper: InstanceWrapper) -> Result<&mut Self> {
        self.controllers.insert(wrapper.token().clone(), wrapper);
        Ok(self)
    }

    /// Register an enhancer (guard, interceptor, pipe, filter)
    pub fn add_injectable(&mut self, wrapper: InstanceWrapper) -> Result<&mut Self> {
        self.injectables.insert(wrapper.token().clone(), wrapper);
        Ok(self)
    }

    /// All providers, the module's own wrapper first
    pub fn providers(&self) -> impl Iterator<Item = &InstanceWrapper> {
        std::iter::once(&self.own).chain(self.providers.values())
    }

    /// The module's own wrapper and the remaining providers in registration order
    pub fn split_providers(&self) -> (&InstanceWrapper, impl Iterator<Item = &InstanceWrapper>) {
        (&self.own, self.providers.values())
    }

    pub fn controllers(&self) -> impl Iterator<Item = &InstanceWrapper> {
        self.controllers.values()
    }

    pub fn injectables(&self) -> impl Iterator<Item = &InstanceWrapper> {
        self.injectables.values()
    }

    pub fn get_provider(&self, token: &InjectionToken) -> Option<&InstanceWrapper> {
        if token == self.own.token() {
            return Some(&self.own);
        }
        self.providers.get(token)
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("distance", &self.distance)
            .field("providers", &(self.providers.len() + 1))
            .field("controllers", &self.controllers.len())
            .field("injectables", &self.injectables.len())
            .finish()
    }
}
