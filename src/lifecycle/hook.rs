use super::{LifecycleHooks, Result, ShutdownSignal};
use futures::future::BoxFuture;
use strum_macros::{AsRefStr, Display};

/// A lifecycle phase, carrying the shutdown signal for the closing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum LifecycleHook {
    #[strum(serialize = "OnModuleInit")]
    ModuleInit,
    #[strum(serialize = "OnApplicationBootstrap")]
    ApplicationBootstrap,
    #[strum(serialize = "OnModuleDestroy")]
    ModuleDestroy,
    #[strum(serialize = "BeforeApplicationShutdown")]
    BeforeApplicationShutdown(Option<ShutdownSignal>),
    #[strum(serialize = "OnApplicationShutdown")]
    ApplicationShutdown(Option<ShutdownSignal>),
}

impl LifecycleHook {
    /// Start this hook on `instance`, or `None` when the instance lacks the capability
    pub(crate) fn call<'a>(
        &self,
        instance: &'a mut dyn LifecycleHooks,
    ) -> Option<BoxFuture<'a, Result<()>>> {
        match *self {
            Self::ModuleInit => instance.as_module_init().map(|hook| hook.on_module_init()),
            Self::ApplicationBootstrap => instance
                .as_application_bootstrap()
                .map(|hook| hook.on_application_bootstrap()),
            Self::ModuleDestroy => instance
                .as_module_destroy()
                .map(|hook| hook.on_module_destroy()),
            Self::BeforeApplicationShutdown(signal) => instance
                .as_before_application_shutdown()
                .map(|hook| hook.before_application_shutdown(signal)),
            Self::ApplicationShutdown(signal) => instance
                .as_application_shutdown()
                .map(|hook| hook.on_application_shutdown(signal)),
        }
    }
}
