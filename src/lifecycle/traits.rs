//! Lifecycle hook traits
//!
//! These traits define the contract for services that need to participate
//! in application lifecycle events. [`LifecycleHooks`] is the capability
//! surface the invokers query: an instance only takes part in a phase when
//! the matching accessor returns `Some`.

use super::{LifecycleError, ShutdownSignal};
use async_trait::async_trait;

/// Called after the module's dependencies are resolved
///
/// Use this hook to:
/// - Initialize database connections
/// - Warm up caches
/// - Subscribe to message queues
///
/// # Example
///
/// ```rust,ignore
/// use lifeline::lifecycle::{OnModuleInit, LifecycleError};
/// use async_trait::async_trait;
///
/// #[async_trait]
/// impl OnModuleInit for DatabaseService {
///     async fn on_module_init(&mut self) -> Result<(), LifecycleError> {
///         self.connection_pool = create_pool(&self.config).await
///             .map_err(|e| LifecycleError::init_failed(e.to_string()))?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait OnModuleInit: Send + Sync {
    /// Called once the host module's instances exist
    async fn on_module_init(&mut self) -> Result<(), LifecycleError>;
}

/// Called after all modules are initialized
///
/// Use this hook to:
/// - Start background tasks
/// - Schedule cron jobs
/// - Perform warm-up operations that depend on other services
///
/// # Example
///
/// ```rust,ignore
/// use lifeline::lifecycle::{OnApplicationBootstrap, LifecycleError};
/// use async_trait::async_trait;
///
/// #[async_trait]
/// impl OnApplicationBootstrap for CacheWarmer {
///     async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError> {
///         self.warm_cache().await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait OnApplicationBootstrap: Send + Sync {
    /// Called after every module has run its init hooks
    ///
    /// This is the last hook before the application starts accepting requests.
    async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError>;
}

/// Called first when the application is closing
///
/// Use this hook to close connections and release resources owned by
/// the service.
#[async_trait]
pub trait OnModuleDestroy: Send + Sync {
    async fn on_module_destroy(&mut self) -> Result<(), LifecycleError>;
}

/// Called after every `OnModuleDestroy` hook has settled
///
/// Receives the signal that triggered the shutdown, if any.
#[async_trait]
pub trait BeforeApplicationShutdown: Send + Sync {
    async fn before_application_shutdown(
        &mut self,
        signal: Option<ShutdownSignal>,
    ) -> Result<(), LifecycleError>;
}

/// Called last when the application is closing
///
/// Use this hook to:
/// - Flush buffers
/// - Cancel pending background tasks
///
/// # Example
///
/// ```rust,ignore
/// use lifeline::lifecycle::{OnApplicationShutdown, LifecycleError, ShutdownSignal};
/// use async_trait::async_trait;
///
/// #[async_trait]
/// impl OnApplicationShutdown for JobScheduler {
///     async fn on_application_shutdown(
///         &mut self,
///         signal: Option<ShutdownSignal>,
///     ) -> Result<(), LifecycleError> {
///         for job in &self.jobs {
///             job.abort();
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait OnApplicationShutdown: Send + Sync {
    async fn on_application_shutdown(
        &mut self,
        signal: Option<ShutdownSignal>,
    ) -> Result<(), LifecycleError>;
}

/// Capability surface of an instance managed by a module
///
/// Every accessor defaults to `None`, so an implementation only names the
/// hooks it actually supports. The `#[derive(LifecycleHooks)]` macro writes
/// these accessors from a `#[lifecycle(...)]` attribute.
///
/// # Example
///
/// ```rust,ignore
/// impl LifecycleHooks for CacheWarmer {
///     fn as_application_bootstrap(&mut self) -> Option<&mut dyn OnApplicationBootstrap> {
///         Some(self)
///     }
/// }
/// ```
pub trait LifecycleHooks: Send + Sync + 'static {
    fn as_module_init(&mut self) -> Option<&mut dyn OnModuleInit> {
        None
    }

    fn as_application_bootstrap(&mut self) -> Option<&mut dyn OnApplicationBootstrap> {
        None
    }

    fn as_module_destroy(&mut self) -> Option<&mut dyn OnModuleDestroy> {
        None
    }

    fn as_before_application_shutdown(&mut self) -> Option<&mut dyn BeforeApplicationShutdown> {
        None
    }

    fn as_application_shutdown(&mut self) -> Option<&mut dyn OnApplicationShutdown> {
        None
    }
}
