//! Splitting a module's wrappers by scope before hooks run.
//!
//! Wrappers whose dependency tree is not static (request scope anywhere in
//! the tree) are dropped from both sides.

use super::{InjectionToken, InstanceWrapper, SharedInstance};

/// One hook candidate: the owning token and the instance, if it was created
#[derive(Clone, Copy)]
pub struct HookTarget<'a> {
    pub token: &'a InjectionToken,
    pub instance: Option<&'a SharedInstance>,
}

/// Instances of static, non-transient wrappers
pub fn non_transient_instances<'a, I>(wrappers: I) -> Vec<HookTarget<'a>>
where
    I: IntoIterator<Item = &'a InstanceWrapper>,
{
    wrappers
        .into_iter()
        .filter(|wrapper| wrapper.is_dependency_tree_static() && !wrapper.is_transient())
        .map(|wrapper| HookTarget {
            token: wrapper.token(),
            instance: wrapper.instance(),
        })
        .collect()
}

/// Every per-inquirer instance of static wrappers
pub fn transient_instances<'a, I>(wrappers: I) -> Vec<HookTarget<'a>>
where
    I: IntoIterator<Item = &'a InstanceWrapper>,
{
    wrappers
        .into_iter()
        .filter(|wrapper| wrapper.is_dependency_tree_static())
        .flat_map(|wrapper| {
            wrapper
                .static_transient_instances()
                .map(move |instance| HookTarget {
                    token: wrapper.token(),
                    instance,
                })
        })
        .collect()
}

/// `(non_transient, transient)`, each in input order
pub fn partition_by_transience<'a>(
    wrappers: &[&'a InstanceWrapper],
) -> (Vec<HookTarget<'a>>, Vec<HookTarget<'a>>) {
    (
        non_transient_instances(wrappers.iter().copied()),
        transient_instances(wrappers.iter().copied()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::shared;
    use crate::lifecycle::LifecycleHooks;

    struct Plain;
    impl LifecycleHooks for Plain {}

    fn names(targets: &[HookTarget<'_>]) -> Vec<String> {
        targets.iter().map(|t| t.token.to_string()).collect()
    }

    #[test]
    fn test_partition_by_transience() {
        let cache = InstanceWrapper::singleton("Cache", shared(Plain));
        let mut logger = InstanceWrapper::transient("Logger");
        logger
            .add_transient_instance("Cache", Some(shared(Plain)))
            .add_transient_instance("Mailer", Some(shared(Plain)));
        let session = InstanceWrapper::request_scoped("Session");
        let mailer = InstanceWrapper::singleton("Mailer", shared(Plain));

        let wrappers = [&cache, &logger, &session, &mailer];
        let (non_transient, transient) = partition_by_transience(&wrappers);

        assert_eq!(names(&non_transient), vec!["Cache", "Mailer"]);
        assert_eq!(names(&transient), vec!["Logger", "Logger"]);
    }

    #[test]
    fn test_request_dependent_wrappers_are_dropped() {
        let mut logger = InstanceWrapper::transient("Logger").with_request_scoped_dependency();
        logger.add_transient_instance("Cache", Some(shared(Plain)));
        let audit =
            InstanceWrapper::singleton("Audit", shared(Plain)).with_request_scoped_dependency();

        let (non_transient, transient) = partition_by_transience(&[&logger, &audit]);
        assert!(non_transient.is_empty());
        assert!(transient.is_empty());
    }

    #[test]
    fn test_absent_instances_are_kept_as_targets() {
        let pending = InstanceWrapper::unresolved("Pending", crate::di::Scope::Singleton);
        let (non_transient, _) = partition_by_transience(&[&pending]);
        assert_eq!(non_transient.len(), 1);
        assert!(non_transient[0].instance.is_none());
    }
}
