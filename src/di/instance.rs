use super::{InjectionToken, Scope};
use crate::lifecycle::LifecycleHooks;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to an instantiated provider or controller
///
/// Hooks take `&mut self`, so instances live behind an async `RwLock`.
pub type SharedInstance = Arc<RwLock<dyn LifecycleHooks>>;

/// Wrap a value into a [`SharedInstance`]
pub fn shared<T: LifecycleHooks>(value: T) -> SharedInstance {
    Arc::new(RwLock::new(value))
}

/// A registered provider, controller or enhancer and its instance(s)
///
/// Singleton wrappers hold a single instance. Transient wrappers hold one
/// static instance per inquirer, in the order the inquirers were first seen.
/// Request-scoped wrappers hold nothing the lifecycle can reach.
pub struct InstanceWrapper {
    token: InjectionToken,
    scope: Scope,
    instance: Option<SharedInstance>,
    transient_instances: IndexMap<String, Option<SharedInstance>>,
    request_scoped_dependency: bool,
}

impl InstanceWrapper {
    /// A singleton wrapper around an already created instance
    pub fn singleton(token: impl Into<InjectionToken>, instance: SharedInstance) -> Self {
        Self::with_instance(token.into(), Scope::Singleton, Some(instance))
    }

    /// A transient wrapper; instances are added per inquirer
    pub fn transient(token: impl Into<InjectionToken>) -> Self {
        Self::with_instance(token.into(), Scope::Transient, None)
    }

    pub fn request_scoped(token: impl Into<InjectionToken>) -> Self {
        Self::with_instance(token.into(), Scope::Request, None)
    }

    /// A wrapper whose instance was never produced (e.g. a factory returned nothing)
    pub fn unresolved(token: impl Into<InjectionToken>, scope: Scope) -> Self {
        Self::with_instance(token.into(), scope, None)
    }

    fn with_instance(token: InjectionToken, scope: Scope, instance: Option<SharedInstance>) -> Self {
        Self {
            token,
            scope,
            instance,
            transient_instances: IndexMap::new(),
            request_scoped_dependency: false,
        }
    }

    /// Mark that something in this wrapper's dependency tree is request-scoped
    pub fn with_request_scoped_dependency(mut self) -> Self {
        self.request_scoped_dependency = true;
        self
    }

    /// Record the instance created for `inquirer`
    ///
    /// A repeated inquirer replaces its previous instance and keeps its position.
    /// Ignored on non-transient wrappers.
    pub fn add_transient_instance(
        &mut self,
        inquirer: impl Into<String>,
        instance: Option<SharedInstance>,
    ) -> &mut Self {
        if self.is_transient() {
            self.transient_instances.insert(inquirer.into(), instance);
        } else {
            tracing::warn!(
                token = %self.token,
                scope = %self.scope,
                "Ignoring transient instance for a non-transient provider"
            );
        }
        self
    }

    pub fn token(&self) -> &InjectionToken {
        &self.token
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn instance(&self) -> Option<&SharedInstance> {
        self.instance.as_ref()
    }

    pub fn is_transient(&self) -> bool {
        self.scope == Scope::Transient
    }

    /// Whether the instances of this wrapper exist for the application lifetime
    pub fn is_dependency_tree_static(&self) -> bool {
        self.scope != Scope::Request && !self.request_scoped_dependency
    }

    /// Per-inquirer instances of a transient wrapper
    pub fn static_transient_instances(&self) -> impl Iterator<Item = Option<&SharedInstance>> {
        self.transient_instances.values().map(Option::as_ref)
    }
}

impl std::fmt::Debug for InstanceWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceWrapper")
            .field("token", &self.token)
            .field("scope", &self.scope)
            .field("resolved", &self.instance.is_some())
            .field("transient_instances", &self.transient_instances.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl LifecycleHooks for Plain {}

    #[test]
    fn test_transient_instances_keep_first_seen_order() {
        let mut wrapper = InstanceWrapper::transient("Logger");
        wrapper
            .add_transient_instance("UserService", Some(shared(Plain)))
            .add_transient_instance("OrderService", None)
            .add_transient_instance("UserService", Some(shared(Plain)));

        let present: Vec<bool> = wrapper
            .static_transient_instances()
            .map(|i| i.is_some())
            .collect();
        assert_eq!(present, vec![true, false]);
    }

    #[test]
    fn test_singleton_ignores_transient_instances() {
        let mut wrapper = InstanceWrapper::singleton("Cache", shared(Plain));
        wrapper.add_transient_instance("UserService", Some(shared(Plain)));
        assert_eq!(wrapper.static_transient_instances().count(), 0);
    }

    #[test]
    fn test_dependency_tree_static() {
        assert!(InstanceWrapper::singleton("A", shared(Plain)).is_dependency_tree_static());
        assert!(InstanceWrapper::transient("B").is_dependency_tree_static());
        assert!(!InstanceWrapper::request_scoped("C").is_dependency_tree_static());
        assert!(
            !InstanceWrapper::singleton("D", shared(Plain))
                .with_request_scoped_dependency()
                .is_dependency_tree_static()
        );
    }
}
