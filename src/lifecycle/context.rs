//! Application Context
//!
//! Drives every module of an application through the lifecycle phases.

use super::invoker::call_module_hook;
use super::{LifecycleError, LifecycleHook, Result, ShutdownHandler, ShutdownSignal};
use crate::config::LifecycleConfig;
use crate::module::ModuleRegistry;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;

/// An initialized application
///
/// Startup phases visit modules furthest from the root first, closing
/// phases visit them in the opposite order.
///
/// # Example
///
/// ```rust,ignore
/// use lifeline::lifecycle::ApplicationContext;
///
/// #[tokio::main]
/// async fn main() {
///     let context = ApplicationContext::builder()
///         .modules(registry)
///         .bootstrap_timeout(Duration::from_secs(30))
///         .build()
///         .await
///         .expect("Failed to initialize application");
///
///     // Serve...
///
///     context.close(None).await.ok();
/// }
/// ```
pub struct ApplicationContext {
    modules: ModuleRegistry,
    config: LifecycleConfig,
    initialized: OnceCell<()>,
    closed: AtomicBool,
}

impl ApplicationContext {
    /// Create a new application builder
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Run init hooks for every module, then bootstrap hooks for every module
    ///
    /// Stops at the first failing module. Does nothing once it has succeeded.
    /// Concurrent callers wait for the run already in flight instead of
    /// starting their own; after a failure the next call tries again.
    pub async fn init(&self) -> Result<()> {
        self.initialized
            .get_or_try_init(|| self.run_startup_phases())
            .await?;
        Ok(())
    }

    async fn run_startup_phases(&self) -> Result<()> {
        tracing::info!("Starting application initialization...");

        with_timeout(
            LifecycleHook::ModuleInit,
            self.config.init_timeout,
            self.call_init_hook(),
        )
        .await?;
        with_timeout(
            LifecycleHook::ApplicationBootstrap,
            self.config.bootstrap_timeout,
            self.call_bootstrap_hook(),
        )
        .await?;

        tracing::info!("Application initialization complete");
        Ok(())
    }

    /// Run destroy, before-shutdown and shutdown hooks
    ///
    /// Every module is visited in every phase even when some fail; the first
    /// error is returned. `shutdown_timeout` bounds each phase on its own, so
    /// a hung destroy hook does not keep the shutdown hooks from running.
    /// Only the first call does any work.
    pub async fn close(&self, signal: Option<ShutdownSignal>) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Application already closed");
            return Ok(());
        }

        tracing::info!("Shutting down application...");

        let limit = self.config.shutdown_timeout;
        let destroyed =
            with_timeout(LifecycleHook::ModuleDestroy, limit, self.call_destroy_hook()).await;
        let prepared = with_timeout(
            LifecycleHook::BeforeApplicationShutdown(signal),
            limit,
            self.call_before_shutdown_hook(signal),
        )
        .await;
        let shut_down = with_timeout(
            LifecycleHook::ApplicationShutdown(signal),
            limit,
            self.call_shutdown_hook(signal),
        )
        .await;

        destroyed.and(prepared).and(shut_down).map_err(|e| {
            tracing::error!("Application shutdown finished with errors: {}", e);
            e
        })?;

        tracing::info!("Application shutdown complete");
        Ok(())
    }

    pub async fn call_init_hook(&self) -> Result<()> {
        self.call_startup_hook(LifecycleHook::ModuleInit).await
    }

    pub async fn call_bootstrap_hook(&self) -> Result<()> {
        self.call_startup_hook(LifecycleHook::ApplicationBootstrap)
            .await
    }

    pub async fn call_destroy_hook(&self) -> Result<()> {
        self.call_closing_hook(LifecycleHook::ModuleDestroy).await
    }

    pub async fn call_before_shutdown_hook(&self, signal: Option<ShutdownSignal>) -> Result<()> {
        self.call_closing_hook(LifecycleHook::BeforeApplicationShutdown(signal))
            .await
    }

    pub async fn call_shutdown_hook(&self, signal: Option<ShutdownSignal>) -> Result<()> {
        self.call_closing_hook(LifecycleHook::ApplicationShutdown(signal))
            .await
    }

    /// Create a shutdown handler listening for the configured signals
    pub fn shutdown_handler(self: &Arc<Self>) -> ShutdownHandler {
        ShutdownHandler::new(Arc::clone(self))
    }

    /// Spawn a background task that waits for a shutdown signal
    /// and closes the context.
    pub fn spawn_shutdown_handler(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let shutdown_handler = self.shutdown_handler();
        tokio::spawn(async move {
            if let Err(e) = shutdown_handler.wait_for_shutdown().await {
                tracing::error!("Error during graceful shutdown: {}", e);
            }
        })
    }

    async fn call_startup_hook(&self, hook: LifecycleHook) -> Result<()> {
        tracing::info!("Calling {} hooks...", hook);

        let modules = self.modules.sorted_by_distance();
        for module in &modules {
            call_module_hook(module, hook).await.map_err(|e| {
                tracing::error!(module = %module.name(), "{} failed: {}", hook, e);
                e
            })?;
        }

        tracing::info!("{} complete ({} modules)", hook, modules.len());
        Ok(())
    }

    async fn call_closing_hook(&self, hook: LifecycleHook) -> Result<()> {
        tracing::info!("Calling {} hooks...", hook);

        let mut first_error = None;
        let modules = self.modules.sorted_by_distance();
        for module in modules.iter().rev() {
            if let Err(e) = call_module_hook(module, hook).await {
                // Log error but continue with other modules
                tracing::error!(module = %module.name(), "{} failed: {}", hook, e);
                first_error.get_or_insert(e);
            }
        }

        tracing::info!("{} complete ({} modules)", hook, modules.len());
        first_error.map_or(Ok(()), Err)
    }
}

async fn with_timeout<F>(phase: impl ToString, timeout: Option<Duration>, fut: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| LifecycleError::timeout(phase, limit))?,
        None => fut.await,
    }
}

/// Builder for [`ApplicationContext`]
pub struct ApplicationBuilder {
    modules: Option<ModuleRegistry>,
    config: LifecycleConfig,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            modules: None,
            config: LifecycleConfig::default(),
        }
    }

    /// Set the instantiated modules
    pub fn modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Replace the whole lifecycle configuration
    pub fn config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a timeout for the OnModuleInit phase
    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.config.init_timeout = Some(timeout);
        self
    }

    /// Set a timeout for the OnApplicationBootstrap phase
    pub fn bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.config.bootstrap_timeout = Some(timeout);
        self
    }

    /// Set a timeout for closing the application
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = Some(timeout);
        self
    }

    /// Assemble the context without running any hook
    ///
    /// Call [`ApplicationContext::init`] before using it.
    pub fn create(self) -> Result<ApplicationContext> {
        let modules = self
            .modules
            .ok_or_else(|| LifecycleError::init_failed("Module registry not provided"))?;

        Ok(ApplicationContext {
            modules,
            config: self.config,
            initialized: OnceCell::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Build and initialize the application
    ///
    /// # Errors
    ///
    /// Returns an error if no modules were provided or any startup hook fails.
    pub async fn build(self) -> Result<ApplicationContext> {
        let context = self.create()?;
        context.init().await?;
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::{InstanceWrapper, shared};
    use crate::lifecycle::{
        LifecycleHooks, OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy,
        OnModuleInit,
    };
    use crate::module::Module;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    struct TestService {
        name: &'static str,
        log: Log,
        fail_destroy: bool,
        bootstrap_delay: Option<Duration>,
        destroy_delay: Option<Duration>,
    }

    impl TestService {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                fail_destroy: false,
                bootstrap_delay: None,
                destroy_delay: None,
            }
        }

        async fn record(&self, phase: &str) {
            self.log.lock().await.push(format!("{}:{}", self.name, phase));
        }
    }

    #[async_trait]
    impl OnModuleInit for TestService {
        async fn on_module_init(&mut self) -> Result<()> {
            self.record("init").await;
            Ok(())
        }
    }

    #[async_trait]
    impl OnApplicationBootstrap for TestService {
        async fn on_application_bootstrap(&mut self) -> Result<()> {
            if let Some(delay) = self.bootstrap_delay {
                tokio::time::sleep(delay).await;
            }
            self.record("bootstrap").await;
            Ok(())
        }
    }

    #[async_trait]
    impl OnModuleDestroy for TestService {
        async fn on_module_destroy(&mut self) -> Result<()> {
            if let Some(delay) = self.destroy_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_destroy {
                return Err(LifecycleError::shutdown_failed("socket stuck"));
            }
            self.record("destroy").await;
            Ok(())
        }
    }

    #[async_trait]
    impl OnApplicationShutdown for TestService {
        async fn on_application_shutdown(&mut self, signal: Option<ShutdownSignal>) -> Result<()> {
            let signal = signal.map_or("none".to_string(), |s| s.to_string());
            self.record(&format!("shutdown({signal})")).await;
            Ok(())
        }
    }

    impl LifecycleHooks for TestService {
        fn as_module_init(&mut self) -> Option<&mut dyn OnModuleInit> {
            Some(self)
        }

        fn as_application_bootstrap(&mut self) -> Option<&mut dyn OnApplicationBootstrap> {
            Some(self)
        }

        fn as_module_destroy(&mut self) -> Option<&mut dyn OnModuleDestroy> {
            Some(self)
        }

        fn as_application_shutdown(&mut self) -> Option<&mut dyn OnApplicationShutdown> {
            Some(self)
        }
    }

    fn module(name: &'static str, distance: usize, service: TestService) -> Module {
        let mut module = Module::new(name, None);
        module
            .set_distance(distance)
            .add_provider(InstanceWrapper::singleton(service.name, shared(service)))
            .unwrap();
        module
    }

    fn registry(log: &Log) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry
            .add_module(module("AppModule", 1, TestService::new("app", log)))
            .unwrap();
        registry
            .add_module(module("DatabaseModule", 2, TestService::new("db", log)))
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_startup_runs_init_then_bootstrap_deepest_first() {
        init_tracing();
        let log = Log::default();
        let context = ApplicationContext::builder()
            .modules(registry(&log))
            .build()
            .await
            .unwrap();

        assert!(context.is_initialized());
        assert_eq!(
            *log.lock().await,
            vec!["db:init", "app:init", "db:bootstrap", "app:bootstrap"]
        );

        // Initialization is not repeated.
        context.init().await.unwrap();
        assert_eq!(log.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_close_runs_closing_phases_root_first() {
        let log = Log::default();
        let context = ApplicationContext::builder()
            .modules(registry(&log))
            .build()
            .await
            .unwrap();
        log.lock().await.clear();

        context.close(Some(ShutdownSignal::Interrupt)).await.unwrap();
        assert!(context.is_closed());
        assert_eq!(
            *log.lock().await,
            vec![
                "app:destroy",
                "db:destroy",
                "app:shutdown(SIGINT)",
                "db:shutdown(SIGINT)",
            ]
        );

        // A second close is a no-op.
        context.close(None).await.unwrap();
        assert_eq!(log.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_close_continues_after_failure() {
        init_tracing();
        let log = Log::default();
        let mut failing = TestService::new("app", &log);
        failing.fail_destroy = true;

        let mut modules = ModuleRegistry::new();
        modules.add_module(module("AppModule", 1, failing)).unwrap();
        modules
            .add_module(module("DatabaseModule", 2, TestService::new("db", &log)))
            .unwrap();

        let context = ApplicationContext::builder()
            .modules(modules)
            .build()
            .await
            .unwrap();
        log.lock().await.clear();

        let err = context.close(None).await.unwrap_err();
        assert!(matches!(err, LifecycleError::HookFailed { ref instance, .. } if instance == "app"));
        assert_eq!(
            *log.lock().await,
            vec!["db:destroy", "app:shutdown(none)", "db:shutdown(none)"]
        );
    }

    #[tokio::test]
    async fn test_bootstrap_timeout() {
        let log = Log::default();
        let mut slow = TestService::new("slow", &log);
        slow.bootstrap_delay = Some(Duration::from_secs(5));

        let mut modules = ModuleRegistry::new();
        modules.add_module(module("AppModule", 1, slow)).unwrap();

        let err = ApplicationContext::builder()
            .modules(modules)
            .bootstrap_timeout(Duration::from_millis(20))
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LifecycleError::Timeout { ref phase, .. } if phase == "OnApplicationBootstrap"));
    }

    #[tokio::test]
    async fn test_build_requires_modules() {
        let err = ApplicationContext::builder().build().await.err().unwrap();
        assert!(matches!(err, LifecycleError::Startup(_)));
    }

    #[tokio::test]
    async fn test_concurrent_init_runs_hooks_once() {
        let log = Log::default();
        let mut slow = TestService::new("app", &log);
        slow.bootstrap_delay = Some(Duration::from_millis(20));

        let mut modules = ModuleRegistry::new();
        modules.add_module(module("AppModule", 1, slow)).unwrap();

        let context = ApplicationContext::builder()
            .modules(modules)
            .create()
            .unwrap();
        assert!(!context.is_initialized());

        let (first, second) = tokio::join!(context.init(), context.init());
        first.unwrap();
        second.unwrap();

        assert!(context.is_initialized());
        assert_eq!(*log.lock().await, vec!["app:init", "app:bootstrap"]);
    }

    #[tokio::test]
    async fn test_shutdown_timeout_applies_per_phase() {
        init_tracing();
        let log = Log::default();
        let mut stuck = TestService::new("app", &log);
        stuck.destroy_delay = Some(Duration::from_secs(5));

        let mut modules = ModuleRegistry::new();
        modules.add_module(module("AppModule", 1, stuck)).unwrap();
        modules
            .add_module(module("DatabaseModule", 2, TestService::new("db", &log)))
            .unwrap();

        let context = ApplicationContext::builder()
            .modules(modules)
            .shutdown_timeout(Duration::from_millis(20))
            .build()
            .await
            .unwrap();
        log.lock().await.clear();

        let err = context.close(None).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Timeout { ref phase, .. } if phase == "OnModuleDestroy"));

        // The hung destroy phase is abandoned; the shutdown hooks still run.
        assert_eq!(
            *log.lock().await,
            vec!["app:shutdown(none)", "db:shutdown(none)"]
        );
    }
}
